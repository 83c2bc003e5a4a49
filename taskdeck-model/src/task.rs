//! Task entity types for `taskdeck`.
//!
//! Defines the task identifier, the 1-5 priority scale, and the [`Task`]
//! record itself. Tasks are plain values: every change goes through the
//! transition function in the `taskdeck` crate, which replaces them
//! wholesale rather than patching fields in place.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::tag::TagId;
use crate::timestamp;

/// Opaque unique identifier for a task.
///
/// Freshly created tasks get a UUID v7 string; identifiers loaded from
/// storage are kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task priority on a 1 (Very Low) to 5 (Very High) scale.
///
/// Deserialization accepts any JSON integer so that hand-edited or legacy
/// data still loads; values beyond `0..=255` saturate. Use
/// [`Priority::is_valid`] or [`Priority::bucket`] where the 1-5 range
/// matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(Self(u8::try_from(raw.max(0)).unwrap_or(u8::MAX)))
    }
}

impl Priority {
    /// Priority 1.
    pub const VERY_LOW: Self = Self(1);
    /// Priority 2.
    pub const LOW: Self = Self(2);
    /// Priority 3.
    pub const MEDIUM: Self = Self(3);
    /// Priority 4.
    pub const HIGH: Self = Self(4);
    /// Priority 5.
    pub const VERY_HIGH: Self = Self(5);

    /// Lowest valid priority value.
    pub const MIN: u8 = 1;
    /// Highest valid priority value.
    pub const MAX: u8 = 5;

    /// Creates a priority, returning `None` outside `1..=5`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Wraps a raw value without range checking.
    #[must_use]
    pub const fn from_raw(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether the value lies in `1..=5`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::MIN && self.0 <= Self::MAX
    }

    /// Zero-based histogram bucket (`0` for priority 1), or `None` when out of range.
    #[must_use]
    pub fn bucket(self) -> Option<usize> {
        if self.is_valid() {
            Some(usize::from(self.0 - Self::MIN))
        } else {
            None
        }
    }

    /// Human-readable label, or `None` when out of range.
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("Very Low"),
            2 => Some("Low"),
            3 => Some("Medium"),
            4 => Some("High"),
            5 => Some("Very High"),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "priority {}", self.0),
        }
    }
}

/// A tracked task.
///
/// Timestamps serialize as ISO-8601 strings; see [`crate::timestamp`] for
/// the accepted input forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, immutable identifier.
    pub id: TaskId,
    /// Display name. Never blank for tasks created through the store.
    pub name: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    #[serde(with = "timestamp::iso8601")]
    pub due_date: DateTime<Utc>,
    /// Whether the task is done. Always agrees with `completed_at`.
    #[serde(default)]
    pub completed: bool,
    /// Priority on the 1-5 scale.
    #[serde(default)]
    pub priority: Priority,
    /// Tags attached to the task.
    #[serde(default)]
    pub tags: BTreeSet<TagId>,
    /// Creation time; never changes after creation.
    #[serde(with = "timestamp::iso8601")]
    pub created_at: DateTime<Utc>,
    /// When the task was last marked complete, if it currently is.
    #[serde(default, with = "timestamp::iso8601_option")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Manual ordering key.
    #[serde(default)]
    pub position: u32,
}

impl Task {
    /// Whether `tag` is attached to this task.
    #[must_use]
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.contains(tag)
    }

    /// Returns a copy with the completion flag flipped.
    ///
    /// Becoming complete stamps `completed_at` with `now`; becoming
    /// incomplete clears it. The two fields therefore always move together.
    #[must_use]
    pub fn toggled(&self, now: DateTime<Utc>) -> Self {
        let completed = !self.completed;
        Self {
            completed,
            completed_at: completed.then_some(now),
            ..self.clone()
        }
    }
}
