//! Drag-and-drop reordering within the displayed list.
//!
//! [`reorder`] is the minimal move primitive: take the item at `from`,
//! reinsert it at `to`, renumber. [`build_reorder_intent`] lifts that to
//! the whole collection so that positions stay dense `0..N` across every
//! task, including tasks hidden by the active filter. Hidden tasks keep
//! the slots they already occupied in the global order; only the visible
//! tasks are permuted among their own slots.

use std::collections::HashSet;

use taskdeck_model::{Task, TaskId};

use crate::tasks::Intent;

/// Moves the item at `from` to `to` and sets `position` to each item's new index.
///
/// Returns `None` if either index is out of range or the move changes nothing.
#[must_use]
pub fn reorder(displayed: &[&Task], from: usize, to: usize) -> Option<Vec<Task>> {
    if from >= displayed.len() || to >= displayed.len() || from == to {
        return None;
    }
    let mut moved: Vec<Task> = displayed.iter().map(|t| (*t).clone()).collect();
    let item = moved.remove(from);
    moved.insert(to, item);
    for (index, task) in moved.iter_mut().enumerate() {
        task.position = to_position(index);
    }
    Some(moved)
}

/// Builds the `ReorderTasks` intent for a drag within `displayed`.
///
/// `all` is the full task collection and `displayed` the currently shown
/// (filtered and sorted) subset of it. The returned intent carries every
/// task with a fresh dense position.
#[must_use]
pub fn build_reorder_intent(
    all: &[Task],
    displayed: &[&Task],
    from: usize,
    to: usize,
) -> Option<Intent> {
    let moved = reorder(displayed, from, to)?;
    let visible: HashSet<&TaskId> = displayed.iter().map(|t| &t.id).collect();

    let mut global: Vec<&Task> = all.iter().collect();
    global.sort_by_key(|t| t.position);

    let mut replacements = moved.into_iter();
    let mut ordered = Vec::with_capacity(global.len());
    for task in global {
        let next = if visible.contains(&task.id) {
            replacements.next().unwrap_or_else(|| task.clone())
        } else {
            task.clone()
        };
        ordered.push(next);
    }
    for (index, task) in ordered.iter_mut().enumerate() {
        task.position = to_position(index);
    }

    tracing::debug!(from, to, tasks = ordered.len(), "built reorder intent");
    Some(Intent::ReorderTasks(ordered))
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
