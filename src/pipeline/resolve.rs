//! Turning a scan code into something that can go on a list
//!
//! Resolution order:
//! 1. the local catalog
//! 2. a [`NameLookup`] for codes the catalog has never seen; a hit is written
//!    back to the catalog under the default list
//! 3. otherwise the code is unknown and a human has to name it

use anyhow::Result;
use tracing::{debug, info};

use crate::domain::{CatalogEntry, ListId, Product, ScanCode};

/// Read/insert access to the local product catalog
pub trait ProductCatalog {
    fn find(&self, code: &ScanCode) -> Result<Option<Product>>;

    fn insert(&self, code: &ScanCode, name: &str, list: ListId) -> Result<()>;
}

/// Source of names for codes missing from the catalog
pub trait NameLookup {
    fn lookup_name(&self, code: &ScanCode) -> Option<String>;
}

/// Lookup that knows no products
#[derive(Debug, Default)]
pub struct NoLookup;

impl NameLookup for NoLookup {
    fn lookup_name(&self, _code: &ScanCode) -> Option<String> {
        None
    }
}

/// Outcome of resolving one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Found in the catalog
    Known(CatalogEntry),

    /// Found by the name lookup and stored in the catalog
    Discovered(CatalogEntry),

    Unknown,
}

impl Resolution {
    pub fn entry(&self) -> Option<&CatalogEntry> {
        match self {
            Resolution::Known(entry) | Resolution::Discovered(entry) => Some(entry),
            Resolution::Unknown => None,
        }
    }
}

/// Resolves scan codes against the catalog
pub struct ScanResolver<'a> {
    catalog: &'a dyn ProductCatalog,
    names: &'a dyn NameLookup,
    default_list: ListId,
}

impl<'a> ScanResolver<'a> {
    pub fn new(
        catalog: &'a dyn ProductCatalog,
        names: &'a dyn NameLookup,
        default_list: ListId,
    ) -> Self {
        Self {
            catalog,
            names,
            default_list,
        }
    }

    pub fn resolve(&self, code: &ScanCode) -> Result<Resolution> {
        if let Some(product) = self.catalog.find(code)? {
            debug!(%code, name = %product.name, "Resolved from catalog");
            return Ok(Resolution::Known(CatalogEntry {
                code: code.clone(),
                list: product.list.unwrap_or(self.default_list),
                name: product.name,
                shelf: product.shelf,
            }));
        }

        match self.names.lookup_name(code) {
            Some(name) => {
                info!(%code, %name, "Resolved by lookup, adding to catalog");
                self.catalog.insert(code, &name, self.default_list)?;
                Ok(Resolution::Discovered(CatalogEntry {
                    code: code.clone(),
                    name,
                    list: self.default_list,
                    shelf: None,
                }))
            }
            None => Ok(Resolution::Unknown),
        }
    }
}
