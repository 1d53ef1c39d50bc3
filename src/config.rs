//! Service configuration.
//!
//! All knobs live in explicit config structs passed into the components that
//! need them — backend selection and concurrency are injectable for tests,
//! never read from the environment at call sites. `from_env()` is the only
//! place environment variables are consulted.

use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "doccheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-slice concurrency cap for verification calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Default LLM serving endpoint (chat-completions compatible invocations URL).
pub const DEFAULT_ENDPOINT_URL: &str =
    "https://dbc-2a72020b-a844.cloud.databricks.com/serving-endpoints/databricks-gpt-oss-120b/invocations";

/// Hard per-call timeout for verification requests, in seconds.
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 30;

/// Hard timeout for checklist generation requests, in seconds.
pub const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = 25;

/// Configuration for the verification engine.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Call the real serving endpoint (`true`) or the simulated backend.
    pub use_real_api: bool,
    /// Maximum concurrent verification calls per slice. Always >= 1.
    pub max_concurrency: usize,
    /// LLM serving endpoint URL.
    pub endpoint_url: String,
    /// Per-call timeout for verification requests.
    pub verify_timeout_secs: u64,
    /// Timeout for checklist generation requests.
    pub generate_timeout_secs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            use_real_api: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            verify_timeout_secs: DEFAULT_VERIFY_TIMEOUT_SECS,
            generate_timeout_secs: DEFAULT_GENERATE_TIMEOUT_SECS,
        }
    }
}

impl VerifyConfig {
    /// Build from environment variables, falling back to defaults:
    /// `USE_REAL_API`, `MAX_CONCURRENCY`, `LLM_ENDPOINT_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            use_real_api: std::env::var("USE_REAL_API")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            max_concurrency: std::env::var("MAX_CONCURRENCY")
                .ok()
                .map(|v| parse_concurrency(&v))
                .unwrap_or(DEFAULT_MAX_CONCURRENCY),
            endpoint_url: std::env::var("LLM_ENDPOINT_URL").unwrap_or(defaults.endpoint_url),
            ..defaults
        }
    }
}

/// Parse a concurrency override. Non-numeric or non-positive values are
/// rejected and replaced by the default — zero would deadlock the runner.
pub fn parse_concurrency(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => n as usize,
        _ => DEFAULT_MAX_CONCURRENCY,
    }
}

/// Top-level application configuration for the server binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub verify: VerifyConfig,
    /// TCP port for the HTTP server.
    pub port: u16,
    /// Directory holding one JSON file per checklist.
    pub checklists_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verify: VerifyConfig::default(),
            port: 3000,
            checklists_dir: PathBuf::from("checklists"),
        }
    }
}

impl AppConfig {
    /// Build from environment variables: `PORT`, `CHECKLISTS_DIR`,
    /// plus everything `VerifyConfig::from_env` reads.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            verify: VerifyConfig::from_env(),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            checklists_dir: std::env::var("CHECKLISTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.checklists_dir),
        }
    }
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info,tower_http=info", APP_NAME)
}
