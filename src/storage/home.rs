//! Shelfscan home directory
//!
//! A home is any directory containing `.shelfscan/`. It holds the config and
//! the product catalog.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Catalog, Config};

/// Environment variable naming the home directory
pub const HOME_ENV: &str = "SHELFSCAN_HOME";

#[derive(Debug, Error)]
pub enum HomeError {
    #[error("Not in a shelfscan home. Run 'shelfscan init' first.")]
    NotInHome,

    #[error("No shelfscan home at {0}. Run 'shelfscan init' there first.")]
    Missing(PathBuf),
}

const DEFAULT_CONFIG: &str = r#"# shelfscan configuration

# Catalog database, relative to this directory
database = "catalog.db"

[remote]
# Credentials may also come from SHELFSCAN_ACCESS_TOKEN and SHELFSCAN_CLIENT_ID
# access_token = ""
# client_id = ""

# List for products that do not name one
# default_list = 0

# Which tasks a shelf sort writes back: "subset" or "append_unshelved"
positions = "subset"

[alerts]
# pushbullet_access_key = ""
# channel_tag = ""

[scanner]
# Scanning this code sorts the list instead of adding a product
# sort_code = ""
"#;

const GITIGNORE: &str = r#"# Catalog database (local state)
*.db
*.db-journal

# Config may hold credentials
config.toml
"#;

/// An initialized shelfscan home
pub struct Home {
    root: PathBuf,
    config: Config,
}

impl Home {
    /// Opens an existing home at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(Config::DIR_NAME).is_dir() {
            return Err(HomeError::Missing(root).into());
        }

        let config = Config::for_home(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the home at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_home_root().ok_or(HomeError::NotInHome)?;

        Self::open(root)
    }

    /// Opens `explicit` if given, otherwise searches from the current directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(root) => Self::open(root),
            None => Self::open_current(),
        }
    }

    /// Initializes a new home at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let dir = root.join(Config::DIR_NAME);

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {} directory: {}", Config::DIR_NAME, dir.display()))?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, GITIGNORE).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let home = Self::open(root)?;
        // Creates the schema up front so a fresh home is immediately usable
        home.catalog()?;

        Ok(home)
    }

    /// Returns the home root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.shelfscan` directory path
    pub fn dir(&self) -> PathBuf {
        self.root.join(Config::DIR_NAME)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Path of the catalog database
    pub fn catalog_path(&self) -> PathBuf {
        self.dir().join(&self.config.home.database)
    }

    /// Opens the product catalog
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::open(&self.catalog_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let home = Home::init(dir.path()).unwrap();

        assert!(home.dir().is_dir());
        assert!(home.dir().join("config.toml").is_file());
        assert!(home.dir().join(".gitignore").is_file());
        assert!(home.catalog_path().is_file());
    }

    #[test]
    fn default_config_file_parses() {
        let dir = TempDir::new().unwrap();
        let home = Home::init(dir.path()).unwrap();

        assert_eq!(home.config().home.database, "catalog.db");
        assert!(home.config().home.remote.default_list.is_none());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Home::init(dir.path()).unwrap();
        Home::init(dir.path()).unwrap();

        assert!(dir.path().join(Config::DIR_NAME).is_dir());
    }

    #[test]
    fn init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let shelfscan_dir = dir.path().join(Config::DIR_NAME);
        fs::create_dir_all(&shelfscan_dir).unwrap();
        fs::write(
            shelfscan_dir.join("config.toml"),
            "database = \"other.db\"\n",
        )
        .unwrap();

        let home = Home::init(dir.path()).unwrap();
        assert!(home.catalog_path().ends_with("other.db"));
    }

    #[test]
    fn open_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        let err = Home::open(dir.path()).err().unwrap();

        assert!(matches!(
            err.downcast_ref::<HomeError>(),
            Some(HomeError::Missing(_))
        ));
    }

    #[test]
    fn locate_explicit_root() {
        let dir = TempDir::new().unwrap();
        Home::init(dir.path()).unwrap();

        let home = Home::locate(Some(dir.path())).unwrap();
        assert_eq!(home.root(), dir.path());
    }
}
