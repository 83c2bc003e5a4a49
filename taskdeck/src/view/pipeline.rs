//! Filter and sort pipeline for the displayed task list.
//!
//! Stages run in a fixed order: search, status, priority, tag, sort.
//! Sorting is stable, so tasks that compare equal keep the relative order
//! they had in the input slice. Equal inputs always give equal outputs.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use taskdeck_model::{Priority, TagId, Task};

/// Which tasks to show by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks still open.
    Active,
}

impl StatusFilter {
    /// Whether `task` passes this filter.
    #[must_use]
    pub const fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Active => !task.completed,
        }
    }

    /// Wire name (`all`, `completed`, `active`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "active" => Ok(Self::Active),
            other => Err(format!(
                "unknown status filter {other:?} (expected all, completed or active)"
            )),
        }
    }
}

/// Key the displayed list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Earliest due date first.
    #[default]
    DueDate,
    /// Highest priority first.
    Priority,
    /// Alphabetical by name, ignoring case.
    Name,
    /// Most recently created first.
    CreatedAt,
    /// Manual order set by reordering, lowest position first.
    Position,
}

impl SortKey {
    /// Wire name (`dueDate`, `priority`, `name`, `createdAt`, `position`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
            Self::Position => "position",
        }
    }

    /// Compares two tasks under this key.
    #[must_use]
    pub fn compare(self, names: &NameCollator, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::Priority => b.priority.cmp(&a.priority),
            Self::Name => names.compare(&a.name, &b.name),
            Self::CreatedAt => b.created_at.cmp(&a.created_at),
            Self::Position => a.position.cmp(&b.position),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dueDate" | "due-date" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "name" => Ok(Self::Name),
            "createdAt" | "created-at" | "created" => Ok(Self::CreatedAt),
            "position" | "manual" => Ok(Self::Position),
            other => Err(format!(
                "unknown sort key {other:?} (expected dueDate, priority, name, createdAt or position)"
            )),
        }
    }
}

/// Locale-aware ordering for task names.
///
/// Uses the CLDR root collation, so accented letters sort next to their
/// base letters and case is a tertiary difference. Names the collator
/// considers equal fall back to the raw strings, keeping the order total.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    /// Collator for the root locale.
    #[must_use]
    pub fn root() -> Self {
        let collator = Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
        Self { collator }
    }

    /// Compares two names.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = match &self.collator {
            Some(collator) => collator.compare(a, b),
            // Root collation data is compiled in; this only runs if it fails to load.
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        primary.then_with(|| a.cmp(b))
    }
}

impl fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameCollator")
            .field("loaded", &self.collator.is_some())
            .finish()
    }
}

/// Everything that determines the displayed list besides the tasks themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Case-insensitive substring matched against name or description.
    pub search: String,
    /// Completion filter.
    pub status: StatusFilter,
    /// Exact priority to keep, if any.
    pub priority: Option<Priority>,
    /// Tag a task must carry, if any.
    pub tag: Option<TagId>,
    /// Ordering of the result.
    pub sort: SortKey,
}

impl ViewQuery {
    fn matches_search(&self, needle: &str, task: &Task) -> bool {
        needle.is_empty()
            || task.name.to_lowercase().contains(needle)
            || task.description.to_lowercase().contains(needle)
    }

    fn accepts(&self, needle: &str, task: &Task) -> bool {
        self.matches_search(needle, task)
            && self.status.accepts(task)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.tag.as_ref().is_none_or(|tag| task.has_tag(tag))
    }
}

/// Computes the displayed task list for `query`.
#[must_use]
pub fn derive_view<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    let needle = query.search.to_lowercase();
    let mut shown: Vec<&Task> = tasks.iter().filter(|t| query.accepts(&needle, t)).collect();
    let names = NameCollator::root();
    shown.sort_by(|a, b| query.sort.compare(&names, a, b));
    shown
}
