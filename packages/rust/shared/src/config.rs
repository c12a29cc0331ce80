//! Application configuration for LexiSync.
//!
//! User config lives at `~/.lexisync/lexisync.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LexiSyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "lexisync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lexisync";

// ---------------------------------------------------------------------------
// Config structs (matching lexisync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote course-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Document-store settings.
    #[serde(default)]
    pub mongo: MongoConfig,

    /// Course allow-list: provider course codes to sync, in order.
    #[serde(default)]
    pub courses: Vec<String>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Root directory of the on-disk response cache.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    "~/.lexisync/cache".into()
}

/// `[provider]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the course provider API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the provider username (never store the value).
    #[serde(default = "default_username_env")]
    pub username_env: String,

    /// Name of the env var holding the provider password (never store the value).
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username_env: default_username_env(),
            password_env: default_password_env(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.duolingo.com".into()
}
fn default_username_env() -> String {
    "LEXISYNC_PROVIDER_USERNAME".into()
}
fn default_password_env() -> String {
    "LEXISYNC_PROVIDER_PASSWORD".into()
}

/// `[mongo]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Name of the env var holding the MongoDB connection URI.
    #[serde(default = "default_uri_env")]
    pub uri_env: String,

    /// Target database name.
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri_env: default_uri_env(),
            database: default_database(),
        }
    }
}

fn default_uri_env() -> String {
    "LEXISYNC_MONGO_URI".into()
}
fn default_database() -> String {
    "lexisync".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.lexisync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LexiSyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.lexisync/lexisync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LexiSyncError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LexiSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LexiSyncError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LexiSyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LexiSyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a required secret from the env var named in the config.
pub fn read_secret_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(LexiSyncError::config(format!(
            "required environment variable {var_name} is not set"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("cache_dir"));
        assert!(toml_str.contains("LEXISYNC_MONGO_URI"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.mongo.database, "lexisync");
        assert_eq!(parsed.provider.username_env, "LEXISYNC_PROVIDER_USERNAME");
    }

    #[test]
    fn config_with_courses() {
        let toml_str = r#"
courses = ["DUOLINGO_VI_EN", "DUOLINGO_EN_VI"]

[defaults]
cache_dir = "/tmp/lexisync-cache"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.courses.len(), 2);
        assert_eq!(config.courses[0], "DUOLINGO_VI_EN");
        assert_eq!(config.defaults.cache_dir, "/tmp/lexisync-cache");
    }

    #[test]
    fn secret_env_validation() {
        // Use a unique env var name to avoid interfering with other tests
        let result = read_secret_env("LEXISYNC_TEST_NONEXISTENT_VAR_12345");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is not set"));
    }
}
