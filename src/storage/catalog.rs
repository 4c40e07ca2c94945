//! SQLite product catalog
//!
//! The catalog sits in `.shelfscan/catalog.db` and maps scan codes to product
//! names, target lists, tags and shelves. It is the first stop when resolving
//! a scan and is edited by hand through the `product`, `list` and `tag`
//! commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ListId, Product, ProductUpdate, ScanCode, ShoppingList, Tag};
use crate::pipeline::ProductCatalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No product with code {0}")]
    ProductNotFound(String),

    #[error("No list with id {0}")]
    ListNotFound(ListId),

    #[error("No tag with id {0}")]
    TagNotFound(i64),

    #[error("Product {0} already exists")]
    ProductExists(String),

    #[error("Corrupt catalog row: {0}")]
    Corrupt(String),
}

/// Column a product listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProductSort {
    #[default]
    Name,
    Ean,
    List,
    Shelf,
}

impl ProductSort {
    fn column(&self) -> &'static str {
        match self {
            ProductSort::Name => "name",
            ProductSort::Ean => "ean",
            ProductSort::List => "list",
            ProductSort::Shelf => "shelf",
        }
    }
}

/// Products grouped under one tag
#[derive(Debug, Clone, Serialize)]
pub struct TagGroup {
    /// `None` for the group of untagged products
    pub tag: Option<Tag>,
    pub products: Vec<Product>,
}

/// SQLite-backed product catalog
pub struct Catalog {
    db_path: PathBuf,
    conn: Connection,
}

impl Catalog {
    /// Schema version - bump when schema changes
    const SCHEMA_VERSION: i32 = 1;

    /// Opens (creating if needed) the catalog at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open catalog database: {}", db_path.display()))?;

        Self::from_connection(conn, db_path.to_path_buf())
    }

    /// Opens a throwaway catalog in memory
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory catalog")?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let catalog = Self { db_path, conn };
        catalog.ensure_schema()?;

        Ok(catalog)
    }

    /// Returns the database path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn ensure_schema(&self) -> Result<()> {
        let current_version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if current_version == 0 {
            self.create_schema()?;
        } else if current_version != Self::SCHEMA_VERSION {
            anyhow::bail!(
                "Catalog {} has schema version {}, expected {}",
                self.db_path.display(),
                current_version,
                Self::SCHEMA_VERSION
            );
        }

        Ok(())
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY,
                name TEXT
            );

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                ord INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS products (
                ean TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                list INTEGER REFERENCES lists(id) ON DELETE SET NULL,
                tag INTEGER REFERENCES tags(id) ON DELETE SET NULL,
                shelf TEXT,
                added_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_products_tag ON products(tag);
            CREATE INDEX IF NOT EXISTS idx_products_list ON products(list);
            ",
        )?;

        self.conn.execute(
            &format!("PRAGMA user_version = {}", Self::SCHEMA_VERSION),
            [],
        )?;

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Looks up a product by scan code
    pub fn product(&self, ean: &ScanCode) -> Result<Option<Product>> {
        let row = self
            .conn
            .query_row(
                "SELECT ean, name, list, tag, shelf, added_at FROM products WHERE ean = ?1",
                params![ean.as_str()],
                product_from_row,
            )
            .optional()?;

        row.transpose()
    }

    /// Adds a product; fails if the code is already known
    pub fn add_product(&self, product: &Product) -> Result<()> {
        if self.product(&product.ean)?.is_some() {
            return Err(CatalogError::ProductExists(product.ean.to_string()).into());
        }
        self.ensure_list(product.list)?;

        self.conn.execute(
            "INSERT INTO products (ean, name, list, tag, shelf, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                product.ean.as_str(),
                product.name,
                product.list.map(|l| l.0 as i64),
                product.tag,
                product.shelf,
                product.added_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Applies `update` to an existing product and returns the result
    pub fn update_product(&self, ean: &ScanCode, update: ProductUpdate) -> Result<Product> {
        let mut product = self
            .product(ean)?
            .ok_or_else(|| CatalogError::ProductNotFound(ean.to_string()))?;

        update.apply(&mut product);
        self.ensure_list(product.list)?;

        self.conn.execute(
            "UPDATE products SET name = ?2, list = ?3, tag = ?4, shelf = ?5 WHERE ean = ?1",
            params![
                product.ean.as_str(),
                product.name,
                product.list.map(|l| l.0 as i64),
                product.tag,
                product.shelf,
            ],
        )?;

        Ok(product)
    }

    pub fn remove_product(&self, ean: &ScanCode) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM products WHERE ean = ?1", params![ean.as_str()])?;
        if removed == 0 {
            return Err(CatalogError::ProductNotFound(ean.to_string()).into());
        }
        Ok(())
    }

    /// Lists all products ordered by `sort`
    pub fn products(&self, sort: ProductSort, descending: bool) -> Result<Vec<Product>> {
        // Column and direction come from closed enums, never from user text
        let sql = format!(
            "SELECT ean, name, list, tag, shelf, added_at FROM products ORDER BY {} {}, ean",
            sort.column(),
            if descending { "DESC" } else { "ASC" }
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().collect()
    }

    /// Products grouped by tag in tag order, untagged products last
    pub fn tag_overview(&self) -> Result<Vec<TagGroup>> {
        let mut groups = Vec::new();
        for tag in self.tags()? {
            let products = self.products_where("tag = ?1", params![tag.id])?;
            groups.push(TagGroup {
                tag: Some(tag),
                products,
            });
        }

        let untagged = self.products_where("tag IS NULL", [])?;
        groups.push(TagGroup {
            tag: None,
            products: untagged,
        });

        Ok(groups)
    }

    fn products_where<P: rusqlite::Params>(&self, condition: &str, params: P) -> Result<Vec<Product>> {
        let sql = format!(
            "SELECT ean, name, list, tag, shelf, added_at FROM products WHERE {} ORDER BY name",
            condition
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().collect()
    }

    /// Creates an unnamed list row so product references stay valid
    fn ensure_list(&self, list: Option<ListId>) -> Result<()> {
        if let Some(list) = list {
            self.conn.execute(
                "INSERT OR IGNORE INTO lists (id, name) VALUES (?1, NULL)",
                params![list.0 as i64],
            )?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Lists
    // -------------------------------------------------------------------------

    pub fn lists(&self) -> Result<Vec<ShoppingList>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM lists ORDER BY id")?;
        let lists = stmt
            .query_map([], |row| {
                Ok(ShoppingList {
                    id: ListId(row.get::<_, i64>(0)? as u64),
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Adds a list, or names an existing unnamed one
    pub fn add_list(&self, id: ListId, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO lists (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![id.0 as i64, name],
        )?;
        Ok(())
    }

    pub fn rename_list(&self, id: ListId, name: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE lists SET name = ?2 WHERE id = ?1",
            params![id.0 as i64, name],
        )?;
        if updated == 0 {
            return Err(CatalogError::ListNotFound(id).into());
        }
        Ok(())
    }

    /// Removes a list; its products fall back to the default list
    pub fn remove_list(&self, id: ListId) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM lists WHERE id = ?1", params![id.0 as i64])?;
        if removed == 0 {
            return Err(CatalogError::ListNotFound(id).into());
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tags
    // -------------------------------------------------------------------------

    pub fn tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, ord FROM tags ORDER BY ord, id")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    ord: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    pub fn add_tag(&self, tag: &Tag) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tags (id, name, ord) VALUES (?1, ?2, ?3)",
            params![tag.id, tag.name, tag.ord],
        )?;
        Ok(())
    }

    pub fn update_tag(&self, id: i64, name: Option<&str>, ord: Option<i64>) -> Result<Tag> {
        let mut tag = self
            .tags()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(CatalogError::TagNotFound(id))?;

        if let Some(name) = name {
            tag.name = name.to_string();
        }
        if let Some(ord) = ord {
            tag.ord = ord;
        }

        self.conn.execute(
            "UPDATE tags SET name = ?2, ord = ?3 WHERE id = ?1",
            params![tag.id, tag.name, tag.ord],
        )?;

        Ok(tag)
    }

    pub fn remove_tag(&self, id: i64) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(CatalogError::TagNotFound(id).into());
        }
        Ok(())
    }
}

impl ProductCatalog for Catalog {
    fn find(&self, code: &ScanCode) -> Result<Option<Product>> {
        self.product(code)
    }

    fn insert(&self, code: &ScanCode, name: &str, list: ListId) -> Result<()> {
        let mut product = Product::new(code.clone(), name);
        product.list = Some(list);
        self.add_product(&product)
    }
}

/// Maps a products row; malformed stored values surface as `CatalogError::Corrupt`
fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Product>> {
    let ean: String = row.get(0)?;
    let name: String = row.get(1)?;
    let list: Option<i64> = row.get(2)?;
    let tag: Option<i64> = row.get(3)?;
    let shelf: Option<String> = row.get(4)?;
    let added_at: String = row.get(5)?;

    Ok(build_product(ean, name, list, tag, shelf, &added_at))
}

fn build_product(
    ean: String,
    name: String,
    list: Option<i64>,
    tag: Option<i64>,
    shelf: Option<String>,
    added_at: &str,
) -> Result<Product> {
    let ean: ScanCode = ean
        .parse()
        .map_err(|e| CatalogError::Corrupt(format!("{}", e)))?;
    let added_at = DateTime::parse_from_rfc3339(added_at)
        .map_err(|e| CatalogError::Corrupt(format!("added_at of {}: {}", ean, e)))?
        .with_timezone(&Utc);

    Ok(Product {
        ean,
        name,
        list: list.map(|l| ListId(l as u64)),
        tag,
        shelf,
        added_at,
    })
}
