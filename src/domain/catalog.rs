//! Local product catalog records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ListId, ScanCode};

/// A known product, keyed by its scan code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub ean: ScanCode,

    /// Display name, used as the remote task title
    pub name: String,

    /// Remote list the product is added to
    pub list: Option<ListId>,

    /// Grouping tag for the browser view
    pub tag: Option<i64>,

    /// Physical location label used for sorting
    pub shelf: Option<String>,

    pub added_at: DateTime<Utc>,
}

impl Product {
    pub fn new(ean: ScanCode, name: impl Into<String>) -> Self {
        Self {
            ean,
            name: name.into(),
            list: None,
            tag: None,
            shelf: None,
            added_at: Utc::now(),
        }
    }
}

/// What a scan resolves to: enough to add the product to a remote list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: ScanCode,
    pub name: String,
    pub list: ListId,
    pub shelf: Option<String>,
}

/// A named shopping list mirrored from the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: ListId,
    pub name: Option<String>,
}

/// A product grouping, displayed in `ord` order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub ord: i64,
}

/// Fields to change on an existing product; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub list: Option<ListId>,
    pub tag: Option<i64>,
    pub shelf: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.list.is_none() && self.tag.is_none() && self.shelf.is_none()
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(list) = self.list {
            product.list = Some(list);
        }
        if let Some(tag) = self.tag {
            product.tag = Some(tag);
        }
        if let Some(shelf) = self.shelf {
            product.shelf = Some(shelf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_only_touches_given_fields() {
        let mut product = Product::new("123".parse().unwrap(), "Milk");
        product.shelf = Some("A1".to_string());

        let update = ProductUpdate {
            list: Some(ListId(5)),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut product);

        assert_eq!(product.name, "Milk");
        assert_eq!(product.list, Some(ListId(5)));
        assert_eq!(product.shelf.as_deref(), Some("A1"));
    }

    #[test]
    fn empty_update() {
        assert!(ProductUpdate::default().is_empty());
    }
}
