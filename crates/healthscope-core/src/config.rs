//! Application configuration
//!
//! Configuration is resolved in two layers:
//! 1. An override file (explicit path, or `<data dir>/config.toml`)
//! 2. Compiled-in defaults
//!
//! Every key in the override file is optional; anything missing falls back
//! to the default. Without any file the app probes [`DEFAULT_ENDPOINT`].
//! An explicit path must exist; only the implicit file may be absent.
//!
//! ```toml
//! [gate]
//! endpoint = "https://example.com/launch"
//! user_agent = "Mozilla/5.0 ..."
//! ```
//!
//! The probe timeout is fixed at [`DEFAULT_GATE_TIMEOUT`] and is not part
//! of the file format.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Remote endpoint probed once per launch
pub const DEFAULT_ENDPOINT: &str = "https://healthscope.app/launch";

/// Fixed client timeout for the launch probe
pub const DEFAULT_GATE_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1";
const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const DEFAULT_ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Name of the data directory under the platform data dir
const APP_DIR: &str = "healthscope";

/// Settings for the launch gate probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// URL probed at launch and shown in the web flow
    pub endpoint: String,
    /// Client timeout for the single probe request (not read from TOML)
    pub timeout: Duration,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_GATE_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            accept_encoding: DEFAULT_ACCEPT_ENCODING.to_string(),
        }
    }
}

impl GateConfig {
    /// Default settings pointed at another endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Browser-like request headers sent with the probe
    pub fn headers(&self) -> [(&'static str, &str); 4] {
        [
            ("User-Agent", self.user_agent.as_str()),
            ("Accept", self.accept.as_str()),
            ("Accept-Language", self.accept_language.as_str()),
            ("Accept-Encoding", self.accept_encoding.as_str()),
        ]
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub gate: GateConfig,
}

impl AppConfig {
    /// Load configuration (override first, then defaults)
    ///
    /// An explicit path that does not exist is an error. Without one the
    /// platform default path is used if present.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        match override_path {
            Some(path) => Self::load_file(path),
            None => match default_config_path() {
                Some(path) => Self::load_optional(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_file(path)
        } else {
            Ok(Self::default())
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Loaded config override");
        parse_config(&content)
    }
}

/// Platform data directory for the store and config (~/.local/share/healthscope)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR))
}

/// Get the default config override path
pub fn default_config_path() -> Option<PathBuf> {
    default_data_dir().map(|d| d.join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    gate: Option<RawGateConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGateConfig {
    endpoint: Option<String>,
    user_agent: Option<String>,
    accept: Option<String>,
    accept_language: Option<String>,
    accept_encoding: Option<String>,
}

/// Parse TOML content into config, filling gaps with defaults
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;

    let defaults = GateConfig::default();
    let gate = match raw.gate {
        Some(g) => GateConfig {
            endpoint: g.endpoint.unwrap_or(defaults.endpoint),
            timeout: defaults.timeout,
            user_agent: g.user_agent.unwrap_or(defaults.user_agent),
            accept: g.accept.unwrap_or(defaults.accept),
            accept_language: g.accept_language.unwrap_or(defaults.accept_language),
            accept_encoding: g.accept_encoding.unwrap_or(defaults.accept_encoding),
        },
        None => defaults,
    };

    Ok(AppConfig { gate })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gate.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.gate.timeout, Duration::from_secs(5));
        assert_eq!(config.gate.headers().len(), 4);
    }

    #[test]
    fn test_parse_partial_override() {
        let config = parse_config(
            r#"
            [gate]
            endpoint = "https://example.com/offer"
            "#,
        )
        .unwrap();

        assert_eq!(config.gate.endpoint, "https://example.com/offer");
        assert_eq!(config.gate.timeout, DEFAULT_GATE_TIMEOUT);
        assert_eq!(config.gate.accept_language, DEFAULT_ACCEPT_LANGUAGE);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        // The timeout is fixed, so the file cannot set it
        assert!(matches!(
            parse_config("[gate]\ntimeout_secs = 2"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[gate]\nendpoint = 12"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[gate]\nretries = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let missing = AppConfig::load_optional(&path).unwrap();
        assert_eq!(missing, AppConfig::default());

        fs::write(&path, "[gate]\nendpoint = \"http://127.0.0.1:9/launch\"\n").unwrap();
        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.gate.endpoint, "http://127.0.0.1:9/launch");
        assert_eq!(AppConfig::load_optional(&path).unwrap(), loaded);
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let typo = dir.path().join("confg.toml");

        assert!(matches!(
            AppConfig::load(Some(&typo)),
            Err(Error::Config(_))
        ));
    }
}
