//! HTTP router.
//!
//! Returns a composable `Router` with everything nested under `/api`.
//! Handlers receive the shared `ApiContext` via `State`; CORS is permissive
//! because the UI is served from a separate dev origin.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::routes;
use crate::api::types::ApiContext;
use crate::checklist::FileChecklistStore;
use crate::config::AppConfig;
use crate::document::{DocumentExtractor, DocumentLoader};
use crate::session::VerificationSession;
use crate::verify::{LlmEndpointClient, VerifyBackend};

/// Build the full application router from configuration.
pub fn app_router(config: AppConfig) -> Router {
    let store = Arc::new(FileChecklistStore::new(config.checklists_dir.clone()));
    build_router(context(config, store))
}

/// Wire up shared state from configuration and a checklist store.
pub fn context(config: AppConfig, store: Arc<dyn crate::checklist::ChecklistStore>) -> ApiContext {
    let backend = Arc::new(VerifyBackend::from_config(&config.verify));
    let loader = DocumentLoader::new(Arc::new(DocumentExtractor));
    let session = Arc::new(VerificationSession::new(
        config.verify.clone(),
        backend,
        loader,
    ));
    let llm = Arc::new(LlmEndpointClient::new(config.verify.endpoint_url.clone()));
    ApiContext {
        config: Arc::new(config),
        store,
        session,
        llm,
    }
}

pub fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route(
            "/process",
            post(routes::process::collected).get(routes::process::streamed),
        )
        .route(
            "/checklists",
            get(routes::checklists::list).post(routes::checklists::create),
        )
        .route(
            "/checklists/:id",
            get(routes::checklists::get)
                .put(routes::checklists::update)
                .delete(routes::checklists::delete),
        )
        .route("/checklists/generate", post(routes::checklists::generate))
        .route("/validate-token", post(routes::auth::validate_token))
        .with_state(ctx);

    Router::new().nest("/api", api).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::io::Write;
    use tower::ServiceExt;

    use crate::checklist::ChecklistStore;
    use crate::config::VerifyConfig;
    use crate::verify::SimulatedVerifier;

    struct TestApp {
        router: Router,
        checklist_id: String,
        document_path: String,
        _dir: tempfile::TempDir,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();

        let document_path = dir.path().join("resume.txt");
        let mut file = std::fs::File::create(&document_path).unwrap();
        write!(
            file,
            "Jane Doe. Contact information: jane@example.com, 555-0100. \
             Work experience includes five years of backend engineering roles. \
             Education: BSc Computer Science, graduated 2019."
        )
        .unwrap();

        let store = Arc::new(FileChecklistStore::new(dir.path().join("checklists")));
        store.ensure_presets().unwrap();
        let checklist_id = {
            let summaries = store.list().unwrap();
            summaries
                .iter()
                .find(|s| s.item_count >= 3)
                .map(|s| s.id.clone())
                .unwrap()
        };

        let mut config = AppConfig::default();
        config.checklists_dir = dir.path().join("checklists");
        config.verify.max_concurrency = 2;

        // Simulated backend without delay so integration tests stay fast.
        let backend = Arc::new(VerifyBackend::Simulated(SimulatedVerifier::without_delay()));
        let loader = DocumentLoader::new(Arc::new(DocumentExtractor));
        let session = Arc::new(VerificationSession::new(
            config.verify.clone(),
            backend,
            loader,
        ));
        let llm = Arc::new(LlmEndpointClient::new(config.verify.endpoint_url.clone()));
        let ctx = ApiContext {
            config: Arc::new(config),
            store,
            session,
            llm,
        };

        TestApp {
            router: build_router(ctx),
            checklist_id,
            document_path: document_path.display().to_string(),
            _dir: dir,
        }
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn process_rejects_missing_parameters() {
        let app = test_app();
        let req = json_request("POST", "/api/process", Some("dapi-token"), r#"{"filename": "x"}"#);
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "MISSING_PARAMETERS");
    }

    #[tokio::test]
    async fn process_rejects_missing_token() {
        let app = test_app();
        let body = format!(
            r#"{{"filename": "resume.txt", "documentPath": "{}", "checklistId": "{}"}}"#,
            app.document_path, app.checklist_id
        );
        let req = json_request("POST", "/api/process", None, &body);
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert_eq!(json["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn process_rejects_missing_document() {
        let app = test_app();
        let body = format!(
            r#"{{"filename": "gone.pdf", "documentPath": "/no/such/file.pdf", "checklistId": "{}"}}"#,
            app.checklist_id
        );
        let req = json_request("POST", "/api/process", Some("dapi-token"), &body);
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["code"], "DOCUMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn process_rejects_unknown_checklist() {
        let app = test_app();
        let body = format!(
            r#"{{"filename": "resume.txt", "documentPath": "{}", "checklistId": "no-such-checklist"}}"#,
            app.document_path
        );
        let req = json_request("POST", "/api/process", Some("dapi-token"), &body);
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["code"], "CHECKLIST_NOT_FOUND");
    }

    #[tokio::test]
    async fn process_returns_full_report() {
        let app = test_app();
        let body = format!(
            r#"{{"filename": "resume.txt", "documentPath": "{}", "checklistId": "{}"}}"#,
            app.document_path, app.checklist_id
        );
        let req = json_request("POST", "/api/process", Some("dapi-token"), &body);
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        let data = &json["data"];
        assert_eq!(data["documentName"], "resume.txt");
        assert_eq!(data["checklistId"], app.checklist_id.as_str());
        let results = data["results"].as_array().unwrap();
        assert!(!results.is_empty());
        let summary = &data["summary"];
        assert_eq!(summary["total"].as_u64().unwrap() as usize, results.len());
        assert_eq!(
            summary["passed"].as_u64().unwrap() + summary["failed"].as_u64().unwrap(),
            summary["total"].as_u64().unwrap()
        );
        // Every result has a status and evidence text.
        for result in results {
            assert!(result["itemId"].is_number());
            assert!(matches!(
                result["status"].as_str().unwrap(),
                "verified" | "failed"
            ));
            assert!(result["evidence"]["text"].is_string());
        }
    }

    #[tokio::test]
    async fn sse_stream_emits_frames_and_terminates() {
        let app = test_app();
        let uri = format!(
            "/api/process?filename=resume.txt&documentPath={}&checklistId={}&token=dapi-token",
            urlencode(&app.document_path),
            app.checklist_id
        );
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        let events: Vec<serde_json::Value> = body
            .split("\n\n")
            .filter_map(|frame| frame.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect();
        assert!(!events.is_empty());

        let processing = events.iter().filter(|e| e["type"] == "processing").count();
        let results = events.iter().filter(|e| e["type"] == "result").count();
        assert_eq!(processing, results);
        assert!(processing >= 3);
        assert_eq!(events.last().unwrap()["type"], "complete");
        assert_eq!(
            events.last().unwrap()["checklistId"],
            app.checklist_id.as_str()
        );
    }

    #[tokio::test]
    async fn sse_requires_token() {
        let app = test_app();
        let uri = format!(
            "/api/process?filename=resume.txt&documentPath={}&checklistId={}",
            urlencode(&app.document_path),
            app.checklist_id
        );
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn checklists_list_includes_presets() {
        let app = test_app();
        let req = Request::builder()
            .method("GET")
            .uri("/api/checklists")
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["data"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn checklist_crud_roundtrip() {
        let app = test_app();

        let create_body = r#"{"name": "Custom", "description": "d", "items": [{"id": 1, "description": "a", "criteria": "b"}]}"#;
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/checklists", None, create_body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = response_json(response).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/checklists/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = response_json(response).await;
        assert_eq!(fetched["data"]["name"], "Custom");

        let update_body = r#"{"name": "Renamed", "description": "d2", "items": [{"id": 1, "description": "a", "criteria": "b"}]}"#;
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/checklists/{id}"),
                None,
                update_body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = response_json(response).await;
        assert_eq!(updated["data"]["name"], "Renamed");
        assert_eq!(updated["data"]["id"], id.as_str());

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/checklists/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/checklists/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn checklist_create_requires_name() {
        let app = test_app();
        let body = r#"{"name": "  ", "description": "d", "items": []}"#;
        let response = app
            .router
            .oneshot(json_request("POST", "/api/checklists", None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generate_uses_simulation_without_real_api() {
        let app = test_app();
        let body = r#"{"documentType": "Invoice", "itemCount": 4}"#;
        let response = app
            .router
            .oneshot(json_request("POST", "/api/checklists/generate", None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0]["description"], "Invoice identifiers");
    }

    #[tokio::test]
    async fn validate_token_rejects_short_tokens() {
        let app = test_app();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/api/validate-token",
                None,
                r#"{"token": "short"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validate_token_accepts_dapi_tokens() {
        let app = test_app();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/api/validate-token",
                None,
                r#"{"token": "dapi0123456789"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_app();
        let req = Request::builder()
            .method("GET")
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Minimal percent-encoding for test URIs (paths contain `/`).
    fn urlencode(s: &str) -> String {
        s.chars()
            .map(|c| match c {
                '/' => "%2F".to_string(),
                ' ' => "%20".to_string(),
                c => c.to_string(),
            })
            .collect()
    }

    // Type check: VerifyConfig stays injectable through the context builder.
    #[test]
    fn context_builder_wires_config() {
        let mut config = AppConfig::default();
        config.verify = VerifyConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ChecklistStore> =
            Arc::new(FileChecklistStore::new(dir.path().to_path_buf()));
        let ctx = context(config, store);
        assert!(!ctx.config.verify.use_real_api);
    }
}
