use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

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

/// Browser-like user agent; several storefronts reject obvious bot strings.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// `None` means the catalog compiled into the binary.
    pub catalog_path: Option<PathBuf>,
    pub cache_dir: PathBuf,
    pub cache_default_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub rate_limit_delay_ms: u64,
    pub search_deadline_secs: u64,
    pub validation_concurrency: usize,
    pub cache_cleanup_cron: String,
    pub api_rate_limit_per_min: u32,
}

impl AppConfig {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    #[must_use]
    pub fn search_deadline(&self) -> Duration {
        Duration::from_secs(self.search_deadline_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "catalog_path",
                &self
                    .catalog_path
                    .as_ref()
                    .map_or_else(|| "[embedded]".to_string(), |p| p.display().to_string()),
            )
            .field("cache_dir", &self.cache_dir)
            .field("cache_default_ttl_secs", &self.cache_default_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("rate_limit_delay_ms", &self.rate_limit_delay_ms)
            .field("search_deadline_secs", &self.search_deadline_secs)
            .field("validation_concurrency", &self.validation_concurrency)
            .field("cache_cleanup_cron", &self.cache_cleanup_cron)
            .field("api_rate_limit_per_min", &self.api_rate_limit_per_min)
            .finish()
    }
}
