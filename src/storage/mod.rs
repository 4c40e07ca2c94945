//! # Storage Layer
//!
//! Local state for shelfscan: configuration and the product catalog.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Products, lists, tags | SQLite | `.shelfscan/catalog.db` |
//! | Config | TOML | `.shelfscan/config.toml` |
//! | Global config | TOML | `~/.config/shelfscan/config.toml` |
//!
//! ## Home Structure
//!
//! ```text
//! .shelfscan/
//! ├── catalog.db            # Product catalog
//! ├── config.toml           # Remote credentials, alerts, scanner
//! └── .gitignore            # Keeps credentials and the database out of git
//! ```
//!
//! ## Key Types
//!
//! - [`Home`] - Entry point for accessing a shelfscan home
//! - [`Catalog`] - Product, list and tag records
//! - [`Config`] - Home and global configuration

mod catalog;
mod config;
mod home;

pub use catalog::{Catalog, CatalogError, ProductSort, TagGroup};
pub use config::{
    AlertConfig, Config, ConfigError, GlobalConfig, HomeConfig, OutputFormat, RemoteConfig,
    ScannerConfig, ACCESS_TOKEN_ENV, CLIENT_ID_ENV,
};
pub use home::{Home, HomeError, HOME_ENV};
