//! In-memory task list for pipeline tests
//!
//! Serves canned reads, accepts or rejects writes by flag, and records every
//! call in order so tests can assert on exactly what reached the service.

use std::cell::RefCell;

use super::api::{RemoteError, TaskListApi, WriteOutcome};
use crate::domain::{ListId, RemoteComment, RemoteTask, TaskId, TaskPositions};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTask { list: ListId, title: String },
    AddComment { task: TaskId, text: String },
    RenameTask { task: TaskId, title: String, revision: u64 },
    ListTasks(ListId),
    ListComments(ListId),
    ListPositions(ListId),
    ApplyPositions { list: ListId, revision: u64, ordered: Vec<TaskId> },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreateTask { .. }
                | Call::AddComment { .. }
                | Call::RenameTask { .. }
                | Call::ApplyPositions { .. }
        )
    }
}

pub struct FakeList {
    pub tasks: Vec<RemoteTask>,
    pub comments: Vec<RemoteComment>,
    pub positions: Vec<TaskPositions>,

    /// Status returned by every read instead of data
    pub read_failure: Option<u16>,

    pub accept_create: bool,
    pub accept_comment: bool,
    pub accept_rename: bool,
    pub accept_positions: bool,

    /// Id handed to the next created task
    pub next_id: u64,

    /// Every call made so far, in order
    pub log: RefCell<Vec<Call>>,
}

impl Default for FakeList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            comments: Vec::new(),
            positions: Vec::new(),
            read_failure: None,
            accept_create: true,
            accept_comment: true,
            accept_rename: true,
            accept_positions: true,
            next_id: 100,
            log: RefCell::new(Vec::new()),
        }
    }
}

impl FakeList {
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn check_read(&self, operation: &'static str) -> Result<(), RemoteError> {
        match self.read_failure {
            Some(status) => Err(RemoteError::Status {
                operation,
                status,
                body: serde_json::json!({ "error": "unavailable" }),
            }),
            None => Ok(()),
        }
    }

    fn outcome(accepted: bool, payload: serde_json::Value) -> WriteOutcome {
        if accepted {
            WriteOutcome::new(true, payload)
        } else {
            WriteOutcome::new(false, serde_json::json!({ "error": { "type": "rejected" } }))
        }
    }
}

impl TaskListApi for FakeList {
    fn create_task(&self, list: ListId, title: &str) -> Result<WriteOutcome, RemoteError> {
        self.record(Call::CreateTask {
            list,
            title: title.to_string(),
        });
        let payload = serde_json::json!({ "id": self.next_id, "revision": 1, "title": title });
        Ok(Self::outcome(self.accept_create, payload))
    }

    fn add_comment(&self, task: TaskId, text: &str) -> Result<WriteOutcome, RemoteError> {
        self.record(Call::AddComment {
            task,
            text: text.to_string(),
        });
        let payload = serde_json::json!({ "task_id": task, "text": text });
        Ok(Self::outcome(self.accept_comment, payload))
    }

    fn rename_task(
        &self,
        task: TaskId,
        title: &str,
        revision: u64,
    ) -> Result<WriteOutcome, RemoteError> {
        self.record(Call::RenameTask {
            task,
            title: title.to_string(),
            revision,
        });
        let payload = serde_json::json!({ "id": task, "title": title, "revision": revision + 1 });
        Ok(Self::outcome(self.accept_rename, payload))
    }

    fn list_tasks(&self, list: ListId) -> Result<Vec<RemoteTask>, RemoteError> {
        self.record(Call::ListTasks(list));
        self.check_read("list tasks")?;
        Ok(self.tasks.clone())
    }

    fn list_comments(&self, list: ListId) -> Result<Vec<RemoteComment>, RemoteError> {
        self.record(Call::ListComments(list));
        self.check_read("list comments")?;
        Ok(self.comments.clone())
    }

    fn list_positions(&self, list: ListId) -> Result<Vec<TaskPositions>, RemoteError> {
        self.record(Call::ListPositions(list));
        self.check_read("list positions")?;
        Ok(self.positions.clone())
    }

    fn apply_positions(
        &self,
        list: ListId,
        revision: u64,
        ordered: &[TaskId],
    ) -> Result<WriteOutcome, RemoteError> {
        self.record(Call::ApplyPositions {
            list,
            revision,
            ordered: ordered.to_vec(),
        });
        let payload = serde_json::json!({ "id": list, "revision": revision + 1, "values": ordered });
        Ok(Self::outcome(self.accept_positions, payload))
    }
}
