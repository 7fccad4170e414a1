use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

/// Optional configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "opsboard.toml";

/// Every interval and knob the controllers use comes from this one object;
/// call sites carry no timing constants of their own.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    /// Resource poll interval; the first poll fires immediately on startup.
    pub resource_poll_secs: u64,
    /// Stagger before the first operations-table load.
    pub operations_initial_delay_ms: u64,
    /// Stagger before the first chart load.
    pub charts_initial_delay_ms: u64,
    /// How long a transient error banner stays up.
    pub error_banner_secs: u64,
    /// Rows generated when the operations endpoint degrades.
    pub fallback_rows: usize,
    /// `limit` query parameter for the operations endpoint.
    pub operations_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: 10,
            resource_poll_secs: 60,
            operations_initial_delay_ms: 500,
            charts_initial_delay_ms: 1000,
            error_banner_secs: 5,
            fallback_rows: 5,
            operations_limit: 10,
        }
    }
}

impl Config {
    /// Loads `opsboard.toml` from the working directory. A missing file is
    /// not an error; an unreadable or unparsable one is.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("failed to parse config file '{}'", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read config file '{}'", path.display()))
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn resource_poll(&self) -> Duration {
        Duration::from_secs(self.resource_poll_secs)
    }

    pub fn operations_initial_delay(&self) -> Duration {
        Duration::from_millis(self.operations_initial_delay_ms)
    }

    pub fn charts_initial_delay(&self) -> Duration {
        Duration::from_millis(self.charts_initial_delay_ms)
    }

    pub fn error_banner(&self) -> Duration {
        Duration::from_secs(self.error_banner_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = \"http://10.0.0.2:9090\"").unwrap();
        writeln!(file, "resource_poll_secs = 30").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.2:9090");
        assert_eq!(config.resource_poll(), Duration::from_secs(30));
        assert_eq!(config.fallback_rows, Config::default().fallback_rows);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resource_poll_secs = \"soon\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
