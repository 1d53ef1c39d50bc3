use doccheck::checklist::FileChecklistStore;
use doccheck::config::AppConfig;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    doccheck::init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(
        version = doccheck::config::APP_VERSION,
        port = config.port,
        use_real_api = config.verify.use_real_api,
        max_concurrency = config.verify.max_concurrency,
        "starting"
    );

    let store = FileChecklistStore::new(config.checklists_dir.clone());
    if let Err(e) = store.ensure_presets() {
        tracing::error!(error = %e, "failed to seed preset checklists");
        return Err(std::io::Error::other(e.to_string()));
    }

    let port = config.port;
    let router = doccheck::api::app_router(config);
    doccheck::api::server::serve(router, port).await
}
