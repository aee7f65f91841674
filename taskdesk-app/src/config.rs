use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ENV_PREFIX: &str = "TASKDESK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    pub api: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root every endpoint path is appended to
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

impl DeskConfig {
    /// Load defaults, then the config file (optional), then `TASKDESK__*` variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix(ENV_PREFIX).separator("__");
        Self::load_with_env(config_path, env)
    }

    pub fn load_with_env(config_path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs as i64)?;

        match config_path {
            // An explicitly named file has to exist
            Some(path) => builder = builder.add_source(File::from(path).required(true)),
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        let config: DeskConfig = builder.add_source(env).build()?.try_deserialize()?;
        tracing::debug!("Loaded configuration: base_url={}", config.api.base_url);
        Ok(config)
    }

    /// Write the built-in defaults as TOML, creating parent directories.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))?;
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdesk").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(HashMap::new()))
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://tasks.internal/api/v1\"\n").unwrap();

        let config = DeskConfig::load_with_env(Some(&path), no_env()).unwrap();
        assert_eq!(config.api.base_url, "http://tasks.internal/api/v1");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntimeout_secs = 5\n").unwrap();

        let mut vars = HashMap::new();
        vars.insert(
            "TASKDESK__API__BASE_URL".to_string(),
            "http://env-host:9000/api/v1".to_string(),
        );
        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(vars));

        let config = DeskConfig::load_with_env(Some(&path), env).unwrap();
        assert_eq!(config.api.base_url, "http://env-host:9000/api/v1");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(DeskConfig::load_with_env(Some(&path), no_env()).is_err());
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        DeskConfig::write_default(&path).unwrap();

        let config = DeskConfig::load_with_env(Some(&path), no_env()).unwrap();
        assert_eq!(config, DeskConfig::default());
    }
}
