use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub graph: GraphConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Which `GraphStore` backend the binaries open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Sqlite
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub store: StoreBackend,
    /// JSON graph fixture, required for the in-memory backend.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
    /// Directory holding the `NNN_name.sql` schema migrations.
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
}

/// Engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 0 disables the node-record cache.
    #[serde(default)]
    pub node_cache_capacity: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            node_cache_capacity: 0,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in GRAPH_EXPLORER_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("GRAPH_EXPLORER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Load and validate a specific config file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
    }

    /// Parse and validate config text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.explorer.request_timeout_ms == 0 {
            anyhow::bail!("explorer.request_timeout_ms must be greater than 0");
        }

        if self.graph.store == StoreBackend::Memory {
            match &self.graph.fixture_path {
                None => anyhow::bail!(
                    "graph.fixture_path is required when graph.store = \"memory\""
                ),
                Some(path) if !path.is_file() => anyhow::bail!(
                    "graph.fixture_path does not point to a file: {}",
                    path.display()
                ),
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.graph.db_path
    }

    /// Per-request deadline applied by the engine
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.explorer.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize tests that touch process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const MINIMAL: &str = r#"
[graph]
db_path = "./graph.db"
"#;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.graph.log_level, "info");
        assert_eq!(config.graph.store, StoreBackend::Sqlite);
        assert_eq!(config.graph.migrations_dir, PathBuf::from("migrations"));
        assert_eq!(config.explorer.request_timeout_ms, 5000);
        assert_eq!(config.explorer.node_cache_capacity, 0);
        assert_eq!(config.http_server.host, "127.0.0.1");
        assert_eq!(config.http_server.port, 8080);
        assert!(config.http_server.allowed_origins.is_empty());
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_full_config() {
        let text = r#"
[graph]
db_path = "/var/lib/graph.db"
log_level = "debug"

[explorer]
request_timeout_ms = 250
node_cache_capacity = 1024

[http_server]
port = 9090
allowed_origins = ["https://ui.example"]
"#;
        let config = Config::from_toml(text).unwrap();
        assert_eq!(config.graph.log_level, "debug");
        assert_eq!(config.explorer.node_cache_capacity, 1024);
        assert_eq!(config.http_server.port, 9090);
        assert_eq!(config.db_path(), Path::new("/var/lib/graph.db"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let text = format!("{}\n[explorer]\nrequest_timeout_ms = 0\n", MINIMAL);
        let err = Config::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn test_memory_store_requires_fixture() {
        let text = r#"
[graph]
db_path = "./graph.db"
store = "memory"
"#;
        let err = Config::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("fixture_path"));
    }

    #[test]
    fn test_memory_store_with_fixture() {
        let temp_dir = TempDir::new().unwrap();
        let fixture = temp_dir.path().join("graph.json");
        fs::write(&fixture, "{}").unwrap();
        let text = format!(
            "[graph]\ndb_path = \"./graph.db\"\nstore = \"memory\"\nfixture_path = \"{}\"\n",
            fixture.to_str().unwrap().replace('\\', "\\\\")
        );
        let config = Config::from_toml(&text).unwrap();
        assert_eq!(config.graph.store, StoreBackend::Memory);
    }

    #[test]
    fn test_config_load_from_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, MINIMAL).unwrap();

        let original = std::env::var("GRAPH_EXPLORER_CONFIG").ok();
        std::env::set_var("GRAPH_EXPLORER_CONFIG", config_path.to_str().unwrap());
        let config = Config::load();
        std::env::remove_var("GRAPH_EXPLORER_CONFIG");
        if let Some(v) = original {
            std::env::set_var("GRAPH_EXPLORER_CONFIG", v);
        }

        assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("GRAPH_EXPLORER_CONFIG").ok();
        std::env::set_var("GRAPH_EXPLORER_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("GRAPH_EXPLORER_CONFIG");
        if let Some(v) = original {
            std::env::set_var("GRAPH_EXPLORER_CONFIG", v);
        }
    }
}
