use std::path::PathBuf;

/// Default number of snapshots retained in the `history` blob.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Largest page size the followers endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct AppConfig {
    pub username: String,
    pub token: String,
    pub data_dir: PathBuf,
    pub history_limit: usize,
    pub per_page: u32,
    pub api_base_url: String,
    /// `owner/name` of the repository whose traffic is recorded, if any.
    pub traffic_repo: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("username", &self.username)
            .field("token", &"[redacted]")
            .field("data_dir", &self.data_dir)
            .field("history_limit", &self.history_limit)
            .field("per_page", &self.per_page)
            .field("api_base_url", &self.api_base_url)
            .field("traffic_repo", &self.traffic_repo)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("log_level", &self.log_level)
            .finish()
    }
}
