//! Domain models for shelfscan
//!
//! Contains the scan pipeline's pure logic without any I/O concerns:
//! title encoding, the create-or-merge decision, and shelf ordering.

mod catalog;
mod id;
mod merge;
mod remote;
mod shelf;
mod title;

pub use catalog::{CatalogEntry, Product, ProductUpdate, ShoppingList, Tag};
pub use id::{IdError, ListId, ScanCode, TaskId};
pub use merge::{plan_merge, MergeDecision};
pub use remote::{RemoteComment, RemoteTask, TaskPositions};
pub use shelf::{shelf_comment, shelf_label, shelf_order, PositionPolicy, SortPlan, SHELF_MARKER};
pub use title::{decode_title, encode_title, DecodedTitle};
