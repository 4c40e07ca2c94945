//! Configuration handling for shelfscan
//!
//! Configuration is stored in `.shelfscan/config.toml` (home) and
//! `~/.config/shelfscan/config.toml` (global). Credentials may also come
//! from the environment so they can stay out of the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ListId, PositionPolicy};
use crate::remote::{Credentials, WunderlistClient};

/// Environment variable overriding `remote.access_token`
pub const ACCESS_TOKEN_ENV: &str = "SHELFSCAN_ACCESS_TOKEN";

/// Environment variable overriding `remote.client_id`
pub const CLIENT_ID_ENV: &str = "SHELFSCAN_CLIENT_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Missing {0}: set it in .shelfscan/config.toml or the environment")]
    Missing(&'static str),
}

/// Connection settings for the remote task list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base URL
    pub api_url: String,

    pub access_token: Option<String>,

    pub client_id: Option<String>,

    /// List used for products without a list of their own
    pub default_list: Option<ListId>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Which tasks a shelf sort writes back
    pub positions: PositionPolicy,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: WunderlistClient::DEFAULT_API_URL.to_string(),
            access_token: None,
            client_id: None,
            default_list: None,
            timeout_seconds: 15,
            positions: PositionPolicy::Subset,
        }
    }
}

impl RemoteConfig {
    /// Resolves credentials from the environment, then the config file
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .or_else(|| self.access_token.clone())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("remote.access_token"))?;

        let client_id = std::env::var(CLIENT_ID_ENV)
            .ok()
            .or_else(|| self.client_id.clone())
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::Missing("remote.client_id"))?;

        Ok(Credentials {
            access_token,
            client_id,
        })
    }

    pub fn require_default_list(&self) -> Result<ListId, ConfigError> {
        self.default_list.ok_or(ConfigError::Missing("remote.default_list"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Settings for failure notifications
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AlertConfig {
    /// Pushbullet access key; without one alerts only go to the log
    pub pushbullet_access_key: Option<String>,

    /// Pushbullet channel to post to
    pub channel_tag: Option<String>,
}

/// Settings for the scan loop
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScannerConfig {
    /// Code that triggers a shelf sort instead of adding a product
    pub sort_code: Option<String>,

    /// List sorted by the sort code (defaults to `remote.default_list`)
    pub sort_list: Option<ListId>,
}

/// Home-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Catalog database file, relative to `.shelfscan/`
    pub database: String,

    pub remote: RemoteConfig,

    pub alerts: AlertConfig,

    pub scanner: ScannerConfig,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            database: "catalog.db".to_string(),
            remote: RemoteConfig::default(),
            alerts: AlertConfig::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

impl HomeConfig {
    /// Checks settings that would otherwise fail much later
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::Invalid("database must not be empty".to_string()));
        }
        if self.remote.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "remote.timeout_seconds must be positive".to_string(),
            ));
        }
        if let Some(code) = &self.scanner.sort_code {
            if code.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "scanner.sort_code must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// List sorted when the sort code is scanned
    pub fn sort_list(&self) -> Result<ListId, ConfigError> {
        match self.scanner.sort_list {
            Some(list) => Ok(list),
            None => self.remote.require_default_list(),
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + home)
#[derive(Debug, Clone)]
pub struct Config {
    pub home: HomeConfig,
    pub global: GlobalConfig,
    pub home_root: Option<PathBuf>,
}

impl Config {
    /// Name of the directory holding config and catalog
    pub const DIR_NAME: &'static str = ".shelfscan";

    /// Loads configuration for a specific home root
    pub fn for_home(home_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let home = Self::load_home_config(home_root)?;

        Ok(Self {
            home,
            global,
            home_root: Some(home_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "shelfscan", "shelfscan").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads home configuration from a specific root
    fn load_home_config(home_root: &Path) -> Result<HomeConfig> {
        let config_path = home_root.join(Self::DIR_NAME).join("config.toml");

        if !config_path.exists() {
            return Ok(HomeConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let config: HomeConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse config")?;

        config.validate()?;
        Ok(config)
    }

    /// Finds the home root by looking for a `.shelfscan/` directory
    pub fn find_home_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(Self::DIR_NAME).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Saves the home configuration
    pub fn save_home(&self) -> Result<()> {
        let root = self
            .home_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No shelfscan home. Run 'shelfscan init' first."))?;
        let config_path = root.join(Self::DIR_NAME).join("config.toml");

        let content =
            toml::to_string_pretty(&self.home).context("Failed to serialize config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = HomeConfig::default();

        assert_eq!(config.database, "catalog.db");
        assert_eq!(config.remote.api_url, "https://a.wunderlist.com/api/v1");
        assert_eq!(config.remote.timeout_seconds, 15);
        assert_eq!(config.remote.positions, PositionPolicy::Subset);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_home_config() {
        let toml = r#"
[remote]
access_token = "abc"
client_id = "def"
default_list = 12345
positions = "append_unshelved"

[alerts]
pushbullet_access_key = "o.xyz"
channel_tag = "shopping"

[scanner]
sort_code = "0000000000000"
"#;

        let config: HomeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.remote.default_list, Some(ListId(12345)));
        assert_eq!(config.remote.positions, PositionPolicy::AppendUnshelved);
        assert_eq!(config.alerts.channel_tag.as_deref(), Some("shopping"));
        assert_eq!(config.scanner.sort_code.as_deref(), Some("0000000000000"));
        assert_eq!(config.sort_list().unwrap(), ListId(12345));
        // untouched sections keep defaults
        assert_eq!(config.database, "catalog.db");
    }

    #[test]
    fn explicit_sort_list_wins() {
        let toml = r#"
[remote]
default_list = 1

[scanner]
sort_list = 2
"#;
        let config: HomeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.sort_list().unwrap(), ListId(2));
    }

    #[test]
    fn missing_default_list_is_reported() {
        let config = HomeConfig::default();
        assert!(matches!(
            config.remote.require_default_list(),
            Err(ConfigError::Missing("remote.default_list"))
        ));
        assert!(config.sort_list().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout_and_blank_sort_code() {
        let mut config = HomeConfig::default();
        config.remote.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = HomeConfig::default();
        config.scanner.sort_code = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn credentials_from_file() {
        // Environment overrides are not set in the test environment
        if std::env::var(ACCESS_TOKEN_ENV).is_ok() || std::env::var(CLIENT_ID_ENV).is_ok() {
            return;
        }

        let mut remote = RemoteConfig::default();
        assert!(remote.credentials().is_err());

        remote.access_token = Some("abc".to_string());
        remote.client_id = Some("def".to_string());
        let credentials = remote.credentials().unwrap();
        assert_eq!(credentials.access_token, "abc");
        assert_eq!(credentials.client_id, "def");
    }

    #[test]
    fn config_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(Config::DIR_NAME)).unwrap();

        let mut config = Config::for_home(dir.path()).unwrap();
        config.home.remote.default_list = Some(ListId(77));
        config.save_home().unwrap();

        let reloaded = Config::for_home(dir.path()).unwrap();
        assert_eq!(reloaded.home.remote.default_list, Some(ListId(77)));
    }

    #[test]
    fn invalid_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let shelfscan_dir = dir.path().join(Config::DIR_NAME);
        fs::create_dir_all(&shelfscan_dir).unwrap();
        fs::write(shelfscan_dir.join("config.toml"), "database = \"\"\n").unwrap();

        assert!(Config::for_home(dir.path()).is_err());
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }
}
