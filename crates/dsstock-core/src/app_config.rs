use std::path::PathBuf;

/// Desktop Chrome identification; several storefronts reject anything else.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub sites_path: PathBuf,
    pub log_level: String,
    /// Upper bound for a single fetch, connect included.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How long a fetched body may be reused. `0` disables the cache.
    pub cache_ttl_secs: u64,
    /// Default character window for text-proximity matching.
    pub proximity_window: usize,
}
