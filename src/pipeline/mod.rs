//! # Scan Pipeline
//!
//! Turns scanner input into remote list updates.
//!
//! ## Flow
//!
//! ```text
//! scan code ──▶ ScanResolver ──▶ ProductMerger ──▶ TaskListApi
//!                  │ catalog          │ create / rename
//!                  │ name lookup      │
//! sort code ──────────────────▶ ShelfSorter ──▶ TaskListApi
//!                                     │ comments / positions
//! ```
//!
//! Every command is a sequential chain of blocking calls. Revisions are
//! read immediately before the write that needs them.
//!
//! ## Key Types
//!
//! - [`ProductMerger`] - Create-or-merge of one product
//! - [`ShelfSorter`] - Shelf ordering of one list
//! - [`ScanResolver`] - Catalog and lookup resolution of a code
//! - [`ScanPipeline`] - Runs a [`ScanCommand`] and alerts on failure

mod merger;
mod resolve;
mod scan;
mod sorter;

pub use merger::ProductMerger;
pub use resolve::{NameLookup, NoLookup, ProductCatalog, Resolution, ScanResolver};
pub use scan::{ScanCommand, ScanPipeline, ScanReport};
pub use sorter::ShelfSorter;
