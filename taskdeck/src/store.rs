//! Task store: the single owner of the tracker state.
//!
//! `TaskStore` is created once by the application root and passed to
//! whatever needs it. Every change is funnelled through
//! [`dispatch`](TaskStore::dispatch), which runs the transition function,
//! saves the new state through the persistence bridge, then notifies
//! subscribers. The higher-level helpers (`create_task`, `toggle_task`, ...)
//! validate input and build the intent; invalid requests dispatch nothing.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use taskdeck_model::{Priority, Tag, TagId, Task, TaskId, TasksState};

use crate::persist::{KeyValueStore, PersistenceBridge};
use crate::tasks::{Intent, TaskError, transition};
use crate::view::{self, Analytics, ViewQuery};

/// Callback invoked with the new state after each committed change.
pub type Subscriber = Box<dyn FnMut(&TasksState)>;

/// Input for a new task. Ids, timestamps and position are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Display name; must not be blank.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Priority, 1-5.
    pub priority: Priority,
    /// Tags to attach.
    pub tags: BTreeSet<TagId>,
}

/// Field-wise edit of an existing task; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New name; must not be blank.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New priority, 1-5.
    pub priority: Option<Priority>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<TagId>>,
}

/// Owns the current [`TasksState`] and its persistence.
pub struct TaskStore<S: KeyValueStore> {
    state: TasksState,
    bridge: PersistenceBridge<S>,
    subscribers: Vec<Subscriber>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Opens the store, loading persisted state or falling back to seed data.
    #[must_use]
    pub fn open(bridge: PersistenceBridge<S>, now: DateTime<Utc>) -> Self {
        let state = bridge.load().unwrap_or_else(|| {
            tracing::info!(key = bridge.key(), "no stored tasks, starting from seed data");
            TasksState::seed(now)
        });
        tracing::debug!(
            tasks = state.tasks.len(),
            tags = state.tags.len(),
            "task store opened"
        );
        Self::with_state(bridge, state)
    }

    /// Creates a store around an explicit initial state without loading.
    #[must_use]
    pub fn with_state(bridge: PersistenceBridge<S>, state: TasksState) -> Self {
        Self {
            state,
            bridge,
            subscribers: Vec::new(),
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &TasksState {
        &self.state
    }

    /// The persistence bridge.
    #[must_use]
    pub const fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    /// Registers a callback run after every committed change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&TasksState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Applies `intent` and, if the state changed, saves and notifies.
    ///
    /// Returns whether the state changed.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let kind = intent.kind();
        let next = transition(&self.state, intent);
        if next == self.state {
            tracing::debug!(intent = kind, "intent left state unchanged");
            return false;
        }
        self.state = next;
        tracing::debug!(intent = kind, tasks = self.state.tasks.len(), "intent applied");
        self.bridge.save(&self.state);
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
        true
    }

    // --- tasks ---

    /// Creates a task and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NameEmpty`] if the trimmed name is empty, or
    /// [`TaskError::InvalidPriority`] if the priority is outside 1-5.
    pub fn create_task(&mut self, draft: NewTask, now: DateTime<Utc>) -> Result<TaskId, TaskError> {
        let name = validate_name(&draft.name, TaskError::NameEmpty)?;
        validate_priority(draft.priority)?;

        let task = Task {
            id: TaskId::new(),
            name,
            description: draft.description,
            due_date: draft.due_date,
            completed: false,
            priority: draft.priority,
            tags: draft.tags,
            created_at: now,
            completed_at: None,
            position: self.next_position(),
        };
        let id = task.id.clone();
        self.dispatch(Intent::AddTask(task));
        Ok(id)
    }

    /// Applies a field-wise edit to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] for an unknown id, and the same
    /// validation errors as [`create_task`](Self::create_task).
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<(), TaskError> {
        let mut task = self.require_task(id)?.clone();
        if let Some(name) = patch.name {
            task.name = validate_name(&name, TaskError::NameEmpty)?;
        }
        if let Some(priority) = patch.priority {
            validate_priority(priority)?;
            task.priority = priority;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }
        self.dispatch(Intent::EditTask(task));
        Ok(())
    }

    /// Flips a task's completion flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] for an unknown id.
    pub fn toggle_task(&mut self, id: &TaskId, now: DateTime<Utc>) -> Result<bool, TaskError> {
        let completed = !self.require_task(id)?.completed;
        self.dispatch(Intent::ToggleTask { id: id.clone(), now });
        Ok(completed)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] for an unknown id.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<(), TaskError> {
        self.require_task(id)?;
        self.dispatch(Intent::DeleteTask(id.clone()));
        Ok(())
    }

    /// Moves a task within the list displayed for `query`.
    ///
    /// `from` and `to` are indices into that displayed list. Returns
    /// whether anything moved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::IndexOutOfRange`] if either index is outside
    /// the displayed list.
    pub fn move_task(&mut self, query: &ViewQuery, from: usize, to: usize) -> Result<bool, TaskError> {
        let displayed = view::derive_view(&self.state.tasks, query);
        let len = displayed.len();
        if let Some(index) = [from, to].into_iter().find(|&i| i >= len) {
            return Err(TaskError::IndexOutOfRange { index, len });
        }
        let Some(intent) = view::build_reorder_intent(&self.state.tasks, &displayed, from, to) else {
            return Ok(false);
        };
        Ok(self.dispatch(intent))
    }

    // --- tags ---

    /// Creates a tag and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TagNameEmpty`] if the trimmed name is empty.
    pub fn create_tag(&mut self, name: &str, color: &str) -> Result<TagId, TaskError> {
        let tag = Tag {
            id: TagId::new(),
            name: validate_name(name, TaskError::TagNameEmpty)?,
            color: color.trim().to_string(),
        };
        let id = tag.id.clone();
        self.dispatch(Intent::AddTag(tag));
        Ok(id)
    }

    /// Renames and/or recolours a tag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TagNotFound`] for an unknown id, or
    /// [`TaskError::TagNameEmpty`] for a blank new name.
    pub fn update_tag(
        &mut self,
        id: &TagId,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), TaskError> {
        let mut tag = self
            .state
            .tag(id)
            .ok_or_else(|| TaskError::TagNotFound(id.to_string()))?
            .clone();
        if let Some(name) = name {
            tag.name = validate_name(name, TaskError::TagNameEmpty)?;
        }
        if let Some(color) = color {
            tag.color = color.trim().to_string();
        }
        self.dispatch(Intent::EditTag(tag));
        Ok(())
    }

    /// Deletes a tag and detaches it from every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TagNotFound`] for an unknown id.
    pub fn delete_tag(&mut self, id: &TagId) -> Result<(), TaskError> {
        if self.state.tag(id).is_none() {
            return Err(TaskError::TagNotFound(id.to_string()));
        }
        self.dispatch(Intent::DeleteTag(id.clone()));
        Ok(())
    }

    // --- projections ---

    /// The task list displayed for `query`.
    #[must_use]
    pub fn view(&self, query: &ViewQuery) -> Vec<&Task> {
        view::derive_view(&self.state.tasks, query)
    }

    /// Aggregates over all tasks as of `now`.
    #[must_use]
    pub fn analytics<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Analytics {
        view::compute_analytics(&self.state.tasks, now)
    }

    fn require_task(&self, id: &TaskId) -> Result<&Task, TaskError> {
        self.state
            .task(id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))
    }

    fn next_position(&self) -> u32 {
        self.state
            .tasks
            .iter()
            .map(|t| t.position.saturating_add(1))
            .max()
            .unwrap_or(0)
    }
}

/// Trims `raw`, rejecting it with `err` if nothing is left.
fn validate_name(raw: &str, err: TaskError) -> Result<String, TaskError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

const fn validate_priority(priority: Priority) -> Result<(), TaskError> {
    if priority.is_valid() {
        Ok(())
    } else {
        Err(TaskError::InvalidPriority(priority.get()))
    }
}
