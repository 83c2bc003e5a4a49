//! Integration tests for derived views: filtering, sorting, analytics,
//! and building reorder intents from a filtered list.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskdeck::tasks::{Intent, transition};
use taskdeck::view::{
    SortKey, StatusFilter, ViewQuery, build_reorder_intent, compute_analytics, derive_view,
};
use taskdeck_model::{Priority, TagId, Task, TaskId, TasksState};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

fn make_task(id: &str, name: &str, priority: u8, completed: bool, position: u32) -> Task {
    Task {
        id: TaskId::from(id),
        name: name.to_string(),
        description: String::new(),
        due_date: now() + Duration::days(i64::from(position) + 1),
        completed,
        priority: Priority::from_raw(priority),
        tags: std::collections::BTreeSet::new(),
        created_at: now() - Duration::hours(i64::from(position)),
        completed_at: completed.then(now),
        position,
    }
}

fn names<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn active_tasks_by_priority() {
    let tasks = vec![
        make_task("1", "p4", 4, false, 0),
        make_task("2", "p2", 2, false, 1),
        make_task("3", "p3", 3, true, 2),
        make_task("4", "p5", 5, false, 3),
    ];
    let query = ViewQuery {
        status: StatusFilter::Active,
        sort: SortKey::Priority,
        ..ViewQuery::default()
    };
    assert_eq!(names(&derive_view(&tasks, &query)), vec!["p5", "p4", "p2"]);
}

#[test]
fn filters_combine() {
    let mut state = TasksState::seed(now());
    state.tasks[1].description = "remember the PROJECT notes".to_string();

    let query = ViewQuery {
        search: "project".to_string(),
        tag: Some(TagId::from("1")),
        ..ViewQuery::default()
    };
    // Task 2 matches the search only via its description, but lacks tag 1.
    assert_eq!(names(&derive_view(&state.tasks, &query)), vec!["Complete project proposal"]);

    let query = ViewQuery {
        priority: Some(Priority::LOW),
        ..ViewQuery::default()
    };
    assert_eq!(names(&derive_view(&state.tasks, &query)), vec!["Grocery shopping"]);
}

#[test]
fn created_at_sort_is_newest_first() {
    let tasks = vec![
        make_task("1", "oldest", 3, false, 2),
        make_task("2", "newest", 3, false, 0),
        make_task("3", "middle", 3, false, 1),
    ];
    let query = ViewQuery {
        sort: SortKey::CreatedAt,
        ..ViewQuery::default()
    };
    assert_eq!(
        names(&derive_view(&tasks, &query)),
        vec!["newest", "middle", "oldest"]
    );
}

#[test]
fn equal_keys_keep_collection_order() {
    let tasks = vec![
        make_task("1", "first", 3, false, 0),
        make_task("2", "second", 3, false, 1),
        make_task("3", "third", 3, false, 2),
    ];
    let query = ViewQuery {
        sort: SortKey::Priority,
        ..ViewQuery::default()
    };
    assert_eq!(
        names(&derive_view(&tasks, &query)),
        vec!["first", "second", "third"]
    );
}

#[test]
fn analytics_ignore_filters() {
    let state = TasksState::seed(now());
    let stats = compute_analytics(&state.tasks, &now());
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.upcoming_tasks, 2);
    assert_eq!(stats.overdue_tasks, 0);
    assert_eq!(stats.priority_distribution, [0, 1, 1, 1, 0]);
}

#[test]
fn reorder_within_filtered_view_round_trips_through_transition() {
    let state = TasksState {
        tasks: vec![
            make_task("a", "a", 3, false, 0),
            make_task("b", "b", 3, true, 1),
            make_task("c", "c", 3, false, 2),
            make_task("d", "d", 3, false, 3),
        ],
        tags: Vec::new(),
    };
    let query = ViewQuery {
        status: StatusFilter::Active,
        sort: SortKey::Position,
        ..ViewQuery::default()
    };
    let shown = derive_view(&state.tasks, &query);
    assert_eq!(names(&shown), vec!["a", "c", "d"]);

    let intent = build_reorder_intent(&state.tasks, &shown, 2, 0).unwrap();
    assert!(matches!(intent, Intent::ReorderTasks(_)));
    let next = transition(&state, intent);

    let order: Vec<&str> = next.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(order, vec!["d", "b", "a", "c"]);
    let positions: Vec<u32> = next.tasks.iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);

    let shown = derive_view(&next.tasks, &query);
    assert_eq!(names(&shown), vec!["d", "a", "c"]);
}
