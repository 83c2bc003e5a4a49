//! The complete tracker state: all tasks plus all tags.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::tag::{Tag, TagId};
use crate::task::{Priority, Task, TaskId};

/// Every task and tag the user has.
///
/// Tasks are kept in insertion order; display order is always derived.
/// This is also the persisted layout: `{"tasks": [...], "tags": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksState {
    /// All tasks, in storage order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// All tags. Order carries no meaning.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl TasksState {
    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Looks up a tag by id.
    #[must_use]
    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| &t.id == id)
    }

    /// Returns the tags a task references that actually exist.
    ///
    /// Ids with no matching tag are skipped rather than reported.
    #[must_use]
    pub fn resolve_tags(&self, task: &Task) -> Vec<&Tag> {
        task.tags.iter().filter_map(|id| self.tag(id)).collect()
    }

    /// Built-in starter data used when nothing has been stored yet.
    ///
    /// Due dates are laid out relative to `now`: one task tomorrow, one in
    /// three days, and one already finished yesterday.
    #[must_use]
    pub fn seed(now: DateTime<Utc>) -> Self {
        let tags = vec![
            Tag {
                id: TagId::from("1"),
                name: "Work".to_string(),
                color: "#3b82f6".to_string(),
            },
            Tag {
                id: TagId::from("2"),
                name: "Personal".to_string(),
                color: "#10b981".to_string(),
            },
            Tag {
                id: TagId::from("3"),
                name: "Urgent".to_string(),
                color: "#ef4444".to_string(),
            },
        ];

        let tag_set = |ids: &[&str]| ids.iter().map(|id| TagId::from(*id)).collect::<BTreeSet<_>>();

        let tasks = vec![
            Task {
                id: TaskId::from("1"),
                name: "Complete project proposal".to_string(),
                description: "Draft and submit the Q3 project proposal".to_string(),
                due_date: now + Duration::days(1),
                completed: false,
                priority: Priority::HIGH,
                tags: tag_set(&["1", "3"]),
                created_at: now,
                completed_at: None,
                position: 0,
            },
            Task {
                id: TaskId::from("2"),
                name: "Grocery shopping".to_string(),
                description: "Buy vegetables, fruit and bread".to_string(),
                due_date: now + Duration::days(3),
                completed: false,
                priority: Priority::LOW,
                tags: tag_set(&["2"]),
                created_at: now,
                completed_at: None,
                position: 1,
            },
            Task {
                id: TaskId::from("3"),
                name: "Review pull requests".to_string(),
                description: String::new(),
                due_date: now - Duration::days(1),
                completed: true,
                priority: Priority::MEDIUM,
                tags: tag_set(&["1"]),
                created_at: now - Duration::days(2),
                completed_at: Some(now - Duration::days(1)),
                position: 2,
            },
        ];

        Self { tasks, tags }
    }
}
