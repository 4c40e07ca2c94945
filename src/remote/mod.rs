//! # Remote Services
//!
//! Everything that talks to the network on behalf of the scan pipeline.
//!
//! ## Services
//!
//! | Service | Type | Purpose |
//! |---------|------|---------|
//! | Task list | [`WunderlistClient`] | Tasks, comments and positions of shopping lists |
//! | Alerts | [`PushbulletAlerts`] | Notes to a human when a scan cannot be handled |
//!
//! ## Error Model
//!
//! ```text
//! read  ── non-2xx ──▶ Err(RemoteError::Status)      aborts the operation
//! write ── non-2xx ──▶ Ok(WriteOutcome { success: false, payload })
//! ```
//!
//! Nothing here retries. A write that loses a revision race fails and stays
//! failed until the next scan.
//!
//! ## Key Types
//!
//! - [`TaskListApi`] - One method per remote call, plus composed helpers
//! - [`WriteOutcome`] - Success flag and raw payload of a write
//! - [`AlertSink`] - Fire-and-forget human notification

mod alert;
mod api;
mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use alert::{AlertSink, LogAlerts, PushbulletAlerts};
pub use api::{RemoteError, TaskListApi, WriteOutcome};
pub use client::{Credentials, WunderlistClient};
