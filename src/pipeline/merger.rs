//! Adds a scanned product to a remote list
//!
//! One merge is a fixed chain of calls with no retry:
//!
//! ```text
//! list_tasks ──▶ plan_merge ──┬── Create ──▶ create_task ──▶ add_comment
//!                             └── Merge  ──▶ rename_task (revision just read)
//! ```
//!
//! A failing read aborts before any write. A rejected write comes back as a
//! [`WriteOutcome`] with `success == false`.

use tracing::{debug, info};

use crate::domain::{plan_merge, ListId, MergeDecision, ScanCode};
use crate::remote::{RemoteError, TaskListApi, WriteOutcome};

/// Create-or-merge of scanned products against one task list service
pub struct ProductMerger<'a, A: TaskListApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: TaskListApi + ?Sized> ProductMerger<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Adds one unit of `name` to `list`
    pub fn merge(
        &self,
        code: &ScanCode,
        name: &str,
        list: ListId,
        shelf: Option<&str>,
    ) -> Result<WriteOutcome, RemoteError> {
        let tasks = self.api.list_tasks(list)?;
        debug!(%list, tasks = tasks.len(), "Fetched list");

        match plan_merge(&tasks, name) {
            MergeDecision::Create { name } => {
                info!(%code, %list, %name, "Creating task");
                self.api.create_task_with_comment(list, code, &name, shelf)
            }
            MergeDecision::Merge {
                task_id,
                new_count,
                revision,
                new_title,
            } => {
                info!(%code, %task_id, new_count, "Merging into existing task");
                self.api.rename_task(task_id, &new_title, revision)
            }
        }
    }
}
