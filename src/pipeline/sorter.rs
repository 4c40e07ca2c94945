//! Reorders a remote list by shelf
//!
//! ```text
//! list_comments ──▶ shelf_order ──▶ (empty? done)
//!                                   └──▶ position_revision ──▶ apply_positions
//! ```
//!
//! The position revision is read right before the write; the sorter never
//! holds one across calls.

use tracing::{debug, info};

use crate::domain::{shelf_order, ListId, PositionPolicy, SortPlan};
use crate::remote::{RemoteError, TaskListApi, WriteOutcome};

/// Shelf sort of remote lists
pub struct ShelfSorter<'a, A: TaskListApi + ?Sized> {
    api: &'a A,
    policy: PositionPolicy,
}

impl<'a, A: TaskListApi + ?Sized> ShelfSorter<'a, A> {
    pub fn new(api: &'a A, policy: PositionPolicy) -> Self {
        Self { api, policy }
    }

    /// Computes the new order for `list` without writing it
    ///
    /// Returns `None` when no task carries a shelf label.
    pub fn plan(&self, list: ListId) -> Result<Option<SortPlan>, RemoteError> {
        let comments = self.api.list_comments(list)?;
        let sorted = shelf_order(&comments);
        debug!(
            %list,
            comments = comments.len(),
            shelved = sorted.len(),
            "Computed shelf order"
        );

        if sorted.is_empty() {
            return Ok(None);
        }

        let positions = self.api.position_revision(list)?;
        Ok(Some(SortPlan::new(
            positions.revision,
            sorted,
            &positions.values,
            self.policy,
        )))
    }

    /// Sorts `list` by shelf
    pub fn sort(&self, list: ListId) -> Result<WriteOutcome, RemoteError> {
        match self.plan(list)? {
            None => {
                info!(%list, "No shelf labels, nothing to sort");
                Ok(WriteOutcome::nothing_to_do())
            }
            Some(plan) => {
                info!(
                    %list,
                    tasks = plan.task_ids.len(),
                    policy = self.policy.as_str(),
                    "Applying shelf order"
                );
                self.api.apply_positions(list, plan.revision, &plan.task_ids)
            }
        }
    }
}
