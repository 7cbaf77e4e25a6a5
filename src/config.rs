//! Application configuration.
//!
//! Optional `~/.checklist/config.toml` with defaults for the web server.
//! CLI flags take precedence; a missing or unreadable file falls back to
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
}

/// `[web]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebConfig {
    /// Host to bind (e.g. "127.0.0.1", "0.0.0.0")
    #[serde(default)]
    pub host: Option<String>,
    /// Port to listen on
    #[serde(default)]
    pub port: Option<u16>,
}

/// App home directory (~/.checklist)
fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".checklist")
}

fn config_path() -> PathBuf {
    app_dir().join("config.toml")
}

/// Load the config file, falling back to defaults.
pub fn load_config() -> Config {
    load_from(&config_path())
}

fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|s| toml::from_str(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.toml"));
        assert!(config.web.host.is_none());
        assert!(config.web.port.is_none());
    }

    #[test]
    fn test_parses_web_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[web]\nhost = \"0.0.0.0\"\nport = 9000\n").unwrap();

        let config = load_from(&path);
        assert_eq!(config.web.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.web.port, Some(9000));
    }

    #[test]
    fn test_unreadable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not valid toml [[[").unwrap();
        let config = load_from(&path);
        assert!(config.web.port.is_none());
    }
}
