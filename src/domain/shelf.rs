//! Shelf annotations and list ordering
//!
//! When a product is first added to a remote list, a comment of the form
//! `EAN: <code>, Shelf: <label>` is attached to its task. Sorting a list
//! orders tasks by that label so the list follows the walk through the shop.
//!
//! Labels compare as plain strings: shelf `"10"` sorts before shelf `"2"`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::id::{ScanCode, TaskId};
use super::remote::RemoteComment;

/// Marker that introduces a shelf label inside a comment
pub const SHELF_MARKER: &str = "Shelf: ";

/// Builds the comment attached to a freshly created task
///
/// A product without a shelf still gets the marker, followed by nothing;
/// [`shelf_label`] reads that as no label.
pub fn shelf_comment(code: &ScanCode, shelf: Option<&str>) -> String {
    format!("EAN: {}, {}{}", code, SHELF_MARKER, shelf.unwrap_or_default())
}

/// Extracts the shelf label from a comment body
///
/// The label is everything after the first marker up to the end of the body.
/// A blank label counts as none, so the task stays out of the shelf order.
pub fn shelf_label(text: &str) -> Option<&str> {
    text.find(SHELF_MARKER)
        .map(|start| &text[start + SHELF_MARKER.len()..])
        .filter(|label| !label.trim().is_empty())
}

/// Orders the tasks of shelf-bearing comments by shelf label
///
/// Comments without a label are dropped. The sort is stable, so tasks on the
/// same shelf keep the order in which the service listed their comments. A
/// task with several labelled comments is placed by its smallest label.
pub fn shelf_order(comments: &[RemoteComment]) -> Vec<TaskId> {
    let mut labelled: Vec<(&str, TaskId)> = comments
        .iter()
        .filter_map(|c| shelf_label(&c.text).map(|label| (label, c.task_id)))
        .collect();

    labelled.sort_by(|a, b| a.0.cmp(b.0));

    let mut seen = HashSet::new();
    labelled
        .into_iter()
        .map(|(_, id)| id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// How tasks without a shelf are treated when positions are written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPolicy {
    /// Send only the shelf-ordered tasks
    #[default]
    Subset,

    /// Send the shelf-ordered tasks followed by every other task in its
    /// current relative order
    AppendUnshelved,
}

impl PositionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionPolicy::Subset => "subset",
            PositionPolicy::AppendUnshelved => "append_unshelved",
        }
    }
}

/// A new ordering for one list, ready to be written
///
/// `task_ids` never repeats an id: a task with several shelf comments is
/// listed once, at its smallest label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortPlan {
    /// Revision of the list's position resource read just before planning
    pub revision: u64,

    pub task_ids: Vec<TaskId>,
}

impl SortPlan {
    /// Builds the position list to send for `policy`
    pub fn new(revision: u64, sorted: Vec<TaskId>, current: &[TaskId], policy: PositionPolicy) -> Self {
        let task_ids = match policy {
            PositionPolicy::Subset => sorted,
            PositionPolicy::AppendUnshelved => {
                let placed: HashSet<TaskId> = sorted.iter().copied().collect();
                let mut all = sorted;
                let mut appended = HashSet::new();
                all.extend(
                    current
                        .iter()
                        .copied()
                        .filter(|id| !placed.contains(id) && appended.insert(*id)),
                );
                all
            }
        };

        Self { revision, task_ids }
    }
}
