//! shelfscan - barcode scans to a shelf-sorted shopping list
//!
//! A scanned product code is resolved against a local catalog and added to a
//! remote task list as `"<count>x <name>"`, merging with an existing task for
//! the same product. A reserved code reorders the list by the shelf labels
//! stored in task comments.

pub mod cli;
pub mod domain;
pub mod pipeline;
pub mod remote;
pub mod storage;

pub use domain::{decode_title, encode_title, ListId, ScanCode, TaskId};
pub use pipeline::{ProductMerger, ShelfSorter};
pub use remote::{RemoteError, TaskListApi, WriteOutcome};
