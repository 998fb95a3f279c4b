//! Configuration for redis-toolbox

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub metrics: MetricsConfig,
}

/// Which store implementation backs the tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// External Redis server
    #[default]
    Redis,
    /// In-process store with Redis semantics (no persistence, no sharing)
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = crate::ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(crate::ToolboxError::Config(format!(
                "Unknown store backend: {other}"
            ))),
        }
    }
}

/// Store connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend selection
    pub backend: Backend,

    /// Redis URL (e.g. "redis://127.0.0.1:6379/0")
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Redis,
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Request session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Largest accepted request line (bytes)
    pub max_request_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: 1024 * 1024,
        }
    }
}

/// Metrics and health check configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable metrics collection
    pub enabled: bool,

    /// Address for metrics/health HTTP server
    pub listen_addr: String,

    /// Seconds between store pings that drive `/ready`
    pub readiness_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1:9090".to_string(),
            readiness_interval_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::ToolboxError::Config(format!("Failed to read config file: {e}"))
        })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::ToolboxError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables or use defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::default();

        if let Ok(backend) = std::env::var("TOOLBOX_STORE_BACKEND") {
            config.store.backend = backend.parse()?;
        }

        if let Ok(url) = std::env::var("TOOLBOX_REDIS_URL") {
            config.store.url = url;
        }

        if let Ok(max_bytes) = std::env::var("TOOLBOX_MAX_REQUEST_BYTES")
            && let Ok(n) = max_bytes.parse()
        {
            config.session.max_request_bytes = n;
        }

        if let Ok(addr) = std::env::var("TOOLBOX_METRICS_ADDR") {
            config.metrics.listen_addr = addr;
        }

        if let Ok(enabled) = std::env::var("TOOLBOX_METRICS_ENABLED") {
            config.metrics.enabled = enabled.to_lowercase() == "true" || enabled == "1";
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.backend, Backend::Redis);
        assert_eq!(config.store.url, "redis://127.0.0.1:6379");
        assert_eq!(config.session.max_request_bytes, 1024 * 1024);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.readiness_interval_secs, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [store]
            backend = "memory"

            [metrics]
            enabled = true
            readiness_interval_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, Backend::Memory);
        assert_eq!(config.store.url, "redis://127.0.0.1:6379");
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.listen_addr, "127.0.0.1:9090");
        assert_eq!(config.metrics.readiness_interval_secs, 30);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nurl = \"redis://cache:6380/2\"").unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.store.url, "redis://cache:6380/2");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/toolbox.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_backend() {
        assert!(Config::from_toml("[store]\nbackend = \"rocks\"").is_err());
        assert!("rocks".parse::<Backend>().is_err());
        assert_eq!("MEMORY".parse::<Backend>().unwrap(), Backend::Memory);
    }
}
