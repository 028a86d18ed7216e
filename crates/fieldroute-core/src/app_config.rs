#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings shared by the API client, the ingestion pipeline and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL, optionally with a path prefix (`.../api/v1`).
    pub api_base_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Wall-clock timeout applied to every individual HTTP attempt.
    pub request_timeout_secs: u64,
    /// Total attempts for a call failing with a 5xx status, initial try included.
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub max_upload_bytes: u64,
    pub preview_rows: usize,
}

impl AppConfig {
    /// Settings used when no environment is available: local backend, 30 s
    /// timeout, 3 attempts one second apart, 5 MB uploads, 2 preview rows.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            env: Environment::Development,
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            max_attempts: 3,
            retry_delay_ms: 1_000,
            max_upload_bytes: 5 * 1024 * 1024,
            preview_rows: 2,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::defaults()
    }
}
