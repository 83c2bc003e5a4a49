//! The pure state transition function.
//!
//! `transition` borrows the current state and returns a complete new one.
//! It never panics: intents whose preconditions do not hold (unknown ids,
//! blank names, duplicate ids) produce an unchanged copy of the input.

use taskdeck_model::{Tag, TagId, Task, TaskId, TasksState};

use super::Intent;

/// Applies `intent` to `state`, returning the resulting state.
#[must_use]
pub fn transition(state: &TasksState, intent: Intent) -> TasksState {
    match intent {
        Intent::AddTask(task) => add_task(state, task),
        Intent::ToggleTask { id, now } => map_task(state, &id, |t| t.toggled(now)),
        Intent::DeleteTask(id) => TasksState {
            tasks: state.tasks.iter().filter(|t| t.id != id).cloned().collect(),
            tags: state.tags.clone(),
        },
        Intent::EditTask(task) => {
            let id = task.id.clone();
            map_task(state, &id, move |_| task.clone())
        }
        Intent::ReplaceAll(next) => next,
        Intent::ReorderTasks(ordered) => reorder_tasks(state, ordered),
        Intent::AddTag(tag) => add_tag(state, tag),
        Intent::EditTag(tag) => TasksState {
            tasks: state.tasks.clone(),
            tags: state
                .tags
                .iter()
                .map(|t| if t.id == tag.id { tag.clone() } else { t.clone() })
                .collect(),
        },
        Intent::DeleteTag(id) => delete_tag(state, &id),
        Intent::Unknown => state.clone(),
    }
}

fn add_task(state: &TasksState, task: Task) -> TasksState {
    if task.name.trim().is_empty() || state.task(&task.id).is_some() {
        return state.clone();
    }
    let mut tasks = state.tasks.clone();
    tasks.push(task);
    TasksState {
        tasks,
        tags: state.tags.clone(),
    }
}

fn map_task(state: &TasksState, id: &TaskId, f: impl Fn(&Task) -> Task) -> TasksState {
    TasksState {
        tasks: state
            .tasks
            .iter()
            .map(|t| if &t.id == id { f(t) } else { t.clone() })
            .collect(),
        tags: state.tags.clone(),
    }
}

/// Tasks named in `ordered` replace their counterparts; the rest are kept.
/// The collection is then stably ordered by position. Ids that do not exist
/// in `state` are ignored.
fn reorder_tasks(state: &TasksState, ordered: Vec<Task>) -> TasksState {
    let mut tasks: Vec<Task> = state
        .tasks
        .iter()
        .map(|t| ordered.iter().find(|o| o.id == t.id).unwrap_or(t).clone())
        .collect();
    tasks.sort_by_key(|t| t.position);
    TasksState {
        tasks,
        tags: state.tags.clone(),
    }
}

fn add_tag(state: &TasksState, tag: Tag) -> TasksState {
    if tag.name.trim().is_empty() || state.tag(&tag.id).is_some() {
        return state.clone();
    }
    let mut tags = state.tags.clone();
    tags.push(tag);
    TasksState {
        tasks: state.tasks.clone(),
        tags,
    }
}

fn delete_tag(state: &TasksState, id: &TagId) -> TasksState {
    TasksState {
        tasks: state
            .tasks
            .iter()
            .map(|t| {
                let mut t = t.clone();
                t.tags.remove(id);
                t
            })
            .collect(),
        tags: state.tags.iter().filter(|t| &t.id != id).cloned().collect(),
    }
}
