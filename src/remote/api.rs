//! Remote task list interface
//!
//! [`TaskListApi`] is the seam between the pipeline and the list service.
//! Each required method is exactly one network call:
//!
//! - reads return typed values, or [`RemoteError::Status`] on a non-2xx reply
//! - writes return a [`WriteOutcome`] whose `success` flag reflects the
//!   status code; a rejected write is not an `Err`
//!
//! The provided methods compose those calls and never retry.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{
    shelf_comment, ListId, RemoteComment, RemoteTask, ScanCode, TaskId, TaskPositions,
};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: serde_json::Value,
    },

    #[error("{operation} request failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} returned an unexpected body: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("Expected exactly one position resource for list {list}, found {found}")]
    Consistency { list: ListId, found: usize },

    #[error("Invalid remote client setup: {0}")]
    Setup(String),
}

/// Result of a mutating call that reached the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteOutcome {
    pub success: bool,

    /// Raw response body (or error body when `success` is false)
    pub payload: serde_json::Value,
}

impl WriteOutcome {
    pub fn new(success: bool, payload: serde_json::Value) -> Self {
        Self { success, payload }
    }

    /// A successful outcome for work that needed no call
    pub fn nothing_to_do() -> Self {
        Self {
            success: true,
            payload: serde_json::json!({}),
        }
    }
}

/// Calls against a remote task list service
pub trait TaskListApi {
    /// Creates a task titled `title` on `list`
    fn create_task(&self, list: ListId, title: &str) -> Result<WriteOutcome, RemoteError>;

    /// Attaches a comment to a task
    fn add_comment(&self, task: TaskId, text: &str) -> Result<WriteOutcome, RemoteError>;

    /// Renames a task; `revision` must be the one most recently read
    fn rename_task(&self, task: TaskId, title: &str, revision: u64)
        -> Result<WriteOutcome, RemoteError>;

    /// Lists the tasks of a list in service order
    fn list_tasks(&self, list: ListId) -> Result<Vec<RemoteTask>, RemoteError>;

    /// Lists every task comment on a list
    fn list_comments(&self, list: ListId) -> Result<Vec<RemoteComment>, RemoteError>;

    /// Reads the raw position resources of a list
    fn list_positions(&self, list: ListId) -> Result<Vec<TaskPositions>, RemoteError>;

    /// Replaces a list's task order
    ///
    /// `ordered` is sent as given. The shelf sorter passes each task id at
    /// most once.
    fn apply_positions(
        &self,
        list: ListId,
        revision: u64,
        ordered: &[TaskId],
    ) -> Result<WriteOutcome, RemoteError>;

    /// Creates a task and tags it with an `EAN: .., Shelf: ..` comment
    ///
    /// A rejected create is returned as-is and no comment is attempted.
    fn create_task_with_comment(
        &self,
        list: ListId,
        code: &ScanCode,
        title: &str,
        shelf: Option<&str>,
    ) -> Result<WriteOutcome, RemoteError> {
        let created = self.create_task(list, title)?;
        if !created.success {
            warn!(%list, title, "Task create rejected");
            return Ok(created);
        }

        let task_id = created
            .payload
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .map(TaskId)
            .ok_or_else(|| RemoteError::Decode {
                operation: "create task",
                message: "response has no numeric 'id'".to_string(),
            })?;
        debug!(%task_id, "Task created, adding shelf comment");

        self.add_comment(task_id, &shelf_comment(code, shelf))
    }

    /// Reads the single position resource of a list
    fn position_revision(&self, list: ListId) -> Result<TaskPositions, RemoteError> {
        let mut positions = self.list_positions(list)?;
        if positions.len() != 1 {
            return Err(RemoteError::Consistency {
                list,
                found: positions.len(),
            });
        }
        Ok(positions.remove(0))
    }
}
