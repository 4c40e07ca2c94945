//! Remote task list resources
//!
//! Shapes of the objects the remote list service returns. Only the fields the
//! pipeline reads are modelled; everything else in a response is ignored.

use serde::{Deserialize, Serialize};

use super::id::{ListId, TaskId};
use super::title::{decode_title, DecodedTitle};

/// A to-do item on a remote list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    pub id: TaskId,

    pub title: String,

    /// Optimistic-concurrency token, required on every update
    pub revision: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
}

impl RemoteTask {
    /// Splits the title into product name and quantity
    pub fn decoded(&self) -> DecodedTitle {
        decode_title(&self.title)
    }
}

/// A free-text note attached to a remote task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteComment {
    pub task_id: TaskId,
    pub text: String,
}

/// The ordering resource of a remote list
///
/// The service keeps exactly one of these per list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPositions {
    pub revision: u64,

    /// Task ids in their current display order
    #[serde(default)]
    pub values: Vec<TaskId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_deserializes_ignoring_extra_fields() {
        let json = r#"{
            "id": 409233670,
            "created_at": "2013-08-30T08:36:13.273Z",
            "list_id": 1234,
            "revision": 3,
            "title": "2x Milk",
            "completed": false
        }"#;

        let task: RemoteTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId(409233670));
        assert_eq!(task.list_id, Some(ListId(1234)));
        assert_eq!(task.revision, 3);
        assert_eq!(task.decoded().name, "Milk");
        assert_eq!(task.decoded().count, 2);
    }

    #[test]
    fn positions_deserialize() {
        let json = r#"{"id": 1234, "list_id": 1234, "revision": 9, "values": [3, 1, 2]}"#;
        let positions: TaskPositions = serde_json::from_str(json).unwrap();

        assert_eq!(positions.revision, 9);
        assert_eq!(positions.values, vec![TaskId(3), TaskId(1), TaskId(2)]);
    }

    #[test]
    fn positions_without_values_are_empty() {
        let positions: TaskPositions = serde_json::from_str(r#"{"revision": 1}"#).unwrap();
        assert!(positions.values.is_empty());
    }
}
