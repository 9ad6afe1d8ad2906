use std::path::PathBuf;

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

/// Reddit script-app credentials for the client-credentials OAuth grant.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub reddit: RedditCredentials,
    /// Object storage location, e.g. `s3://bucket`, `file:///var/lib/redditetl`, `memory://`.
    pub storage_url: String,
    /// Collection used when a trigger does not name one.
    pub default_subreddit: Option<String>,
    pub post_limit: u32,
    /// Folder-like prefix for object keys, always empty or ending in `/`
    /// (`raw` → `raw/14022024093000.csv`).
    pub key_prefix: String,
    pub persist_local_copy: bool,
    pub local_copy_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub unique_batch_ids: bool,
    pub run_max_retries: u32,
    pub run_retry_delay_secs: u64,
    /// Six-field cron expression (seconds first) for the `schedule` command.
    pub schedule: String,
}
