use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Fjall keyspace path for persisted panel settings
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Upper bound on the body of a settings import request
    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_path: default_store_path(),
            max_import_bytes: default_max_import_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/settings")
}

fn default_max_import_bytes() -> usize {
    1024 * 1024 // 1 MB
}

/// Panel / render-target configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PanelConfig {
    /// Origin of the application hosting the panel. Frame sources resolving
    /// to this origin are rejected (self-nesting prevention).
    #[serde(default = "default_host_origin")]
    pub host_origin: String,
    /// How long to wait for a frame load/error signal before clearing the
    /// loading state anyway
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    /// Delay between clearing and reassigning the frame source on retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl PanelConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            host_origin: default_host_origin(),
            load_timeout_ms: default_load_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_host_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_load_timeout_ms() -> u64 {
    5000
}

fn default_retry_delay_ms() -> u64 {
    100
}

/// Location search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Geocoding endpoint (Nominatim-compatible)
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// Debounce window between keystroke and request
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Queries shorter than this never hit the network
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_search_user_agent")]
    pub user_agent: String,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            max_results: default_max_results(),
            user_agent: default_search_user_agent(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_max_results() -> usize {
    5
}

fn default_search_user_agent() -> String {
    format!("framebox/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.server.max_import_bytes, 1024 * 1024);
        assert_eq!(config.panel.load_timeout(), Duration::from_millis(5000));
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.max_results, 5);
    }
}
