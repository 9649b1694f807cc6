//! Application configuration.
//!
//! Configuration is read once at startup from a JSON file and never mutated
//! afterwards; adapters share it behind an `Arc`. The file nests everything
//! under a `bottlenose` key:
//!
//! ```json
//! {
//!   "bottlenose": {
//!     "ace": {"executable": "ace", "cmdargs": ["-r", "root_strict"], "timeout": 60},
//!     "allow_jsonp": false,
//!     "cors_origins": [],
//!     "grammars": [{"key": "erg", "path": "/opt/grammars/erg.dat"}]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default name of the ACE executable, looked up on `PATH`.
pub const DEFAULT_ACE_EXECUTABLE: &str = "ace";

/// Default upper bound on a single ACE invocation, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default HTTP listen address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Config file read when `BOTTLENOSE_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Locale forced on ACE so it reads and writes UTF-8.
pub const UTF8_LOCALE: &str = "en_US.UTF-8";

/// Environment variable naming the config file.
pub const ENV_CONFIG: &str = "BOTTLENOSE_CONFIG";
/// Environment variable overriding the ACE executable.
pub const ENV_ACE: &str = "BOTTLENOSE_ACE";
/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "BOTTLENOSE_PORT";
/// Environment variable overriding the listen host.
pub const ENV_HOST: &str = "BOTTLENOSE_HOST";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Grammar key must not be empty (path {0})")]
    EmptyGrammarKey(PathBuf),

    #[error("Grammar key '{0}' is configured more than once")]
    DuplicateGrammar(String),

    #[error("ACE executable must not be empty")]
    EmptyExecutable,

    #[error("ACE timeout must be at least one second")]
    ZeroTimeout,
}

/// How to run the ACE processor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AceConfig {
    /// Path or name of the `ace` binary.
    pub executable: PathBuf,
    /// Arguments passed on every invocation, before the per-request ones.
    pub cmdargs: Vec<String>,
    /// Seconds before a running invocation is killed.
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
    /// Extra environment for the child process.
    pub env: BTreeMap<String, String>,
}

impl Default for AceConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_ACE_EXECUTABLE),
            cmdargs: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            env: BTreeMap::new(),
        }
    }
}

impl AceConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Environment overrides for the child: the configured ones plus a UTF-8
    /// `LANG` unless the configuration sets `LANG` itself.
    pub fn environment(&self) -> Vec<(String, String)> {
        let mut env: Vec<(String, String)> = self
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !self.env.contains_key("LANG") {
            env.push(("LANG".to_string(), UTF8_LOCALE.to_string()));
        }
        env
    }
}

/// One registered grammar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrammarConfig {
    /// Key used in request paths, e.g. `erg` in `/erg/parse`.
    pub key: String,
    /// Compiled grammar image passed to `ace -g`.
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `bottlenose` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub ace: AceConfig,
    /// Whether `callback=` may wrap responses as JSON-P.
    pub allow_jsonp: bool,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub grammars: Vec<GrammarConfig>,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ace: AceConfig::default(),
            allow_jsonp: false,
            cors_origins: Vec::new(),
            grammars: Vec::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bottlenose: AppConfig,
}

impl AppConfig {
    /// Parse the contents of a config file.
    pub fn from_json_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str::<ConfigFile>(text)
            .map(|file| file.bottlenose)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, path)
    }

    /// Load configuration the way the server does at startup.
    ///
    /// The file named by `BOTTLENOSE_CONFIG` must exist. Without it,
    /// `config.json` in the working directory is used when present and the
    /// defaults otherwise. Environment overrides are applied last.
    pub fn load_with_env<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::load(Path::new(&path))?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)?
                } else {
                    tracing::warn!(
                        "No {} found and {} unset, starting with no grammars",
                        DEFAULT_CONFIG_FILE,
                        ENV_CONFIG
                    );
                    Self::default()
                }
            }
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BOTTLENOSE_ACE`, `BOTTLENOSE_HOST` and `BOTTLENOSE_PORT`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ace) = lookup(ENV_ACE) {
            self.ace.executable = PathBuf::from(ace);
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port,
            })?;
        }
        Ok(())
    }

    /// Check values serde cannot rule out on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ace.executable.as_os_str().is_empty() {
            return Err(ConfigError::EmptyExecutable);
        }
        if self.ace.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ace.executable, PathBuf::from("ace"));
        assert_eq!(config.ace.timeout(), Duration::from_secs(60));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.allow_jsonp);
        assert!(config.grammars.is_empty());
    }

    #[test]
    fn test_parse_nested_config() {
        let text = r#"{
            "bottlenose": {
                "ace": {"executable": "/usr/local/bin/ace", "cmdargs": ["-1"], "timeout": 5},
                "allow_jsonp": true,
                "grammars": [
                    {"key": "erg", "path": "/g/erg.dat", "description": "English Resource Grammar"},
                    {"key": "jacy", "path": "/g/jacy.dat"}
                ]
            }
        }"#;
        let config = AppConfig::from_json_str(text, Path::new("config.json")).unwrap();
        assert_eq!(config.ace.executable, PathBuf::from("/usr/local/bin/ace"));
        assert_eq!(config.ace.cmdargs, vec!["-1"]);
        assert_eq!(config.ace.timeout_secs, 5);
        assert!(config.allow_jsonp);
        assert_eq!(config.grammars.len(), 2);
        assert_eq!(config.grammars[1].description, None);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let err = AppConfig::from_json_str("{", Path::new("bad.json")).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_environment_forces_utf8_lang() {
        let ace = AceConfig::default();
        assert_eq!(
            ace.environment(),
            vec![("LANG".to_string(), UTF8_LOCALE.to_string())]
        );

        let mut ace = AceConfig::default();
        ace.env.insert("LANG".into(), "C.UTF-8".into());
        assert_eq!(
            ace.environment(),
            vec![("LANG".to_string(), "C.UTF-8".to_string())]
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                (ENV_ACE, "/opt/ace"),
                (ENV_HOST, "0.0.0.0"),
                (ENV_PORT, "9090"),
            ]))
            .unwrap();
        assert_eq!(config.ace.executable, PathBuf::from("/opt/ace"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_PORT, .. }));
    }

    #[test]
    fn test_load_from_config_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bottlenose.json");
        std::fs::write(
            &path,
            r#"{"bottlenose": {"grammars": [{"key": "erg", "path": "/g/erg.dat"}]}}"#,
        )
        .unwrap();
        let config =
            AppConfig::load_with_env(env(&[(ENV_CONFIG, path.to_str().unwrap())])).unwrap();
        assert_eq!(config.grammars[0].key, "erg");
    }

    #[test]
    fn test_missing_named_config_is_an_error() {
        let err = AppConfig::load_with_env(env(&[(ENV_CONFIG, "/nonexistent/bottlenose.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.ace.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }
}
