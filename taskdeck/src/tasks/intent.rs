//! Intents: the closed set of requests the transition function understands.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use taskdeck_model::timestamp;
use taskdeck_model::{Tag, TagId, Task, TaskId, TasksState};

/// A request to change the tracker state.
///
/// Serialized as `{"type": "ADD_TASK", "payload": ...}`. Any unrecognised
/// `type` deserializes to [`Intent::Unknown`], whatever its payload, and the
/// transition function treats it as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum Intent {
    /// Append a new task.
    AddTask(Task),
    /// Flip a task's completion flag.
    ToggleTask {
        /// Task to toggle.
        id: TaskId,
        /// Time recorded as `completed_at` when the task becomes complete.
        #[serde(with = "timestamp::iso8601")]
        now: DateTime<Utc>,
    },
    /// Remove a task.
    DeleteTask(TaskId),
    /// Replace a task wholesale, matched by id.
    EditTask(Task),
    /// Discard the current state and adopt this one.
    ReplaceAll(TasksState),
    /// Install new positions for the given tasks.
    ReorderTasks(Vec<Task>),
    /// Append a new tag.
    AddTag(Tag),
    /// Replace a tag wholesale, matched by id.
    EditTag(Tag),
    /// Remove a tag and detach it from every task.
    DeleteTag(TagId),
    /// An intent kind this build does not know about.
    #[serde(other)]
    Unknown,
}

/// Wire names of every intent kind this build understands.
const KNOWN_KINDS: [&str; 9] = [
    "ADD_TASK",
    "TOGGLE_TASK",
    "DELETE_TASK",
    "EDIT_TASK",
    "REPLACE_ALL",
    "REORDER_TASKS",
    "ADD_TAG",
    "EDIT_TAG",
    "DELETE_TAG",
];

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Self::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        let known = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|kind| KNOWN_KINDS.contains(&kind));
        if !known {
            // The payload of a foreign kind has no shape we can check.
            if let Some(object) = value.as_object_mut() {
                object.remove("payload");
            }
        }
        Self::deserialize(value).map_err(D::Error::custom)
    }
}

impl Intent {
    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddTask(_) => "add_task",
            Self::ToggleTask { .. } => "toggle_task",
            Self::DeleteTask(_) => "delete_task",
            Self::EditTask(_) => "edit_task",
            Self::ReplaceAll(_) => "replace_all",
            Self::ReorderTasks(_) => "reorder_tasks",
            Self::AddTag(_) => "add_tag",
            Self::EditTag(_) => "edit_tag",
            Self::DeleteTag(_) => "delete_tag",
            Self::Unknown => "unknown",
        }
    }
}
