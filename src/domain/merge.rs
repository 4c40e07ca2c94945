//! Create-or-merge decision for a scanned product
//!
//! Scanning a product that is already on the list bumps the quantity in the
//! existing task's title instead of adding a second task. Tasks are keyed by
//! their decoded name; the match is exact and case-sensitive, and when several
//! tasks decode to the same name the first one in list order wins.

use serde::Serialize;

use super::id::TaskId;
use super::remote::RemoteTask;
use super::title::encode_title;

/// What to do with a scanned product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MergeDecision {
    /// No task carries this name yet
    Create { name: String },

    /// Rename an existing task to the bumped quantity
    Merge {
        task_id: TaskId,
        new_count: u32,
        revision: u64,
        new_title: String,
    },
}

/// Decides whether `name` creates a new task or merges into an existing one
pub fn plan_merge(tasks: &[RemoteTask], name: &str) -> MergeDecision {
    let existing = tasks
        .iter()
        .map(|task| (task, task.decoded()))
        .find(|(_, decoded)| decoded.name == name);

    match existing {
        None => MergeDecision::Create {
            name: name.to_string(),
        },
        Some((task, decoded)) => {
            let new_count = decoded.count.saturating_add(1);
            MergeDecision::Merge {
                task_id: task.id,
                new_count,
                revision: task.revision,
                new_title: encode_title(new_count, name),
            }
        }
    }
}
