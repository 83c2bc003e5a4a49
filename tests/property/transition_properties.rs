//! Property-based tests for the mutation engine and view pipeline.
//!
//! Uses proptest to verify:
//! 1. `transition` never modifies its input state.
//! 2. Toggling the same task twice restores its completion flag.
//! 3. After `DeleteTag`, no task references the deleted tag.
//! 4. `derive_view` is deterministic and only returns accepted tasks.
//! 5. A reorder intent keeps every task and leaves positions dense.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use taskdeck::tasks::{Intent, transition};
use taskdeck::view::{SortKey, StatusFilter, ViewQuery, build_reorder_intent, derive_view};
use taskdeck_model::{Priority, Tag, TagId, Task, TaskId, TasksState};

const TAG_IDS: [&str; 4] = ["1", "2", "3", "4"];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default()
}

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..60 * 24 * 60).prop_map(|minutes| base_time() + Duration::minutes(minutes))
}

fn arb_tags() -> impl Strategy<Value = BTreeSet<TagId>> {
    prop::collection::btree_set(prop::sample::select(TAG_IDS.to_vec()), 0..3)
        .prop_map(|ids| ids.into_iter().map(TagId::from).collect())
}

fn arb_task(index: usize) -> impl Strategy<Value = Task> {
    (
        "[a-zA-Z ]{1,12}",
        "[a-z ]{0,16}",
        arb_time(),
        any::<bool>(),
        1u8..=5,
        arb_tags(),
        arb_time(),
    )
        .prop_map(
            move |(name, description, due_date, completed, priority, tags, created_at)| Task {
                id: TaskId::from(format!("task-{index}")),
                name,
                description,
                due_date,
                completed,
                priority: Priority::from_raw(priority),
                tags,
                created_at,
                completed_at: completed.then_some(created_at),
                position: u32::try_from(index).unwrap_or(u32::MAX),
            },
        )
}

fn arb_state() -> impl Strategy<Value = TasksState> {
    (0usize..8).prop_flat_map(|len| {
        let tasks: Vec<_> = (0..len).map(arb_task).collect();
        tasks.prop_map(|tasks| TasksState {
            tasks,
            tags: TAG_IDS
                .iter()
                .map(|id| Tag {
                    id: TagId::from(*id),
                    name: format!("tag {id}"),
                    color: "#64748b".to_string(),
                })
                .collect(),
        })
    })
}

fn arb_query() -> impl Strategy<Value = ViewQuery> {
    (
        prop::option::of("[a-z]{1,2}"),
        prop::sample::select(vec![
            StatusFilter::All,
            StatusFilter::Active,
            StatusFilter::Completed,
        ]),
        prop::option::of(1u8..=5),
        prop::option::of(prop::sample::select(TAG_IDS.to_vec())),
        prop::sample::select(vec![
            SortKey::DueDate,
            SortKey::Priority,
            SortKey::Name,
            SortKey::CreatedAt,
            SortKey::Position,
        ]),
    )
        .prop_map(|(search, status, priority, tag, sort)| ViewQuery {
            search: search.unwrap_or_default(),
            status,
            priority: priority.map(Priority::from_raw),
            tag: tag.map(TagId::from),
            sort,
        })
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        (0usize..10, arb_time()).prop_map(|(i, now)| Intent::ToggleTask {
            id: TaskId::from(format!("task-{i}")),
            now,
        }),
        (0usize..10).prop_map(|i| Intent::DeleteTask(TaskId::from(format!("task-{i}")))),
        arb_task(20).prop_map(Intent::AddTask),
        arb_task(2).prop_map(Intent::EditTask),
        prop::sample::select(TAG_IDS.to_vec()).prop_map(|id| Intent::DeleteTag(TagId::from(id))),
        Just(Intent::Unknown),
    ]
}

proptest! {
    #[test]
    fn transition_never_mutates_input(state in arb_state(), intent in arb_intent()) {
        let before = state.clone();
        let _ = transition(&state, intent);
        prop_assert_eq!(state, before);
    }

    #[test]
    fn double_toggle_restores_completion(state in arb_state(), pick in 0usize..8, now in arb_time()) {
        prop_assume!(!state.tasks.is_empty());
        let id = state.tasks[pick % state.tasks.len()].id.clone();
        let intent = Intent::ToggleTask { id: id.clone(), now };
        let once = transition(&state, intent.clone());
        let twice = transition(&once, intent);

        let original = state.task(&id).map(|t| t.completed);
        prop_assert_eq!(once.task(&id).map(|t| t.completed), original.map(|c| !c));
        prop_assert_eq!(twice.task(&id).map(|t| t.completed), original);
        for task in &twice.tasks {
            prop_assert_eq!(task.completed, task.completed_at.is_some());
        }
    }

    #[test]
    fn delete_tag_leaves_no_references(state in arb_state(), tag in prop::sample::select(TAG_IDS.to_vec())) {
        let id = TagId::from(tag);
        let next = transition(&state, Intent::DeleteTag(id.clone()));
        prop_assert!(next.tag(&id).is_none());
        prop_assert!(next.tasks.iter().all(|t| !t.has_tag(&id)));
        prop_assert_eq!(next.tasks.len(), state.tasks.len());
    }

    #[test]
    fn derive_view_is_deterministic(state in arb_state(), query in arb_query()) {
        let first: Vec<&TaskId> = derive_view(&state.tasks, &query).iter().map(|t| &t.id).collect();
        let second: Vec<&TaskId> = derive_view(&state.tasks, &query).iter().map(|t| &t.id).collect();
        prop_assert_eq!(&first, &second);

        for task in derive_view(&state.tasks, &query) {
            prop_assert!(query.status.accepts(task));
            prop_assert!(query.priority.is_none_or(|p| task.priority == p));
            prop_assert!(query.tag.as_ref().is_none_or(|t| task.has_tag(t)));
        }
    }

    #[test]
    fn reorder_keeps_every_task(state in arb_state(), query in arb_query(), from in 0usize..8, to in 0usize..8) {
        let shown = derive_view(&state.tasks, &query);
        if let Some(intent) = build_reorder_intent(&state.tasks, &shown, from, to) {
            let next = transition(&state, intent);
            let mut before: Vec<&str> = state.tasks.iter().map(|t| t.id.as_str()).collect();
            let mut after: Vec<&str> = next.tasks.iter().map(|t| t.id.as_str()).collect();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);

            let positions: Vec<u32> = next.tasks.iter().map(|t| t.position).collect();
            let dense: Vec<u32> = (0..).take(next.tasks.len()).collect();
            prop_assert_eq!(positions, dense);
        }
    }
}
