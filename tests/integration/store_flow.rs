//! End-to-end tests: store plus file-backed persistence plus the command
//! front end, across simulated restarts.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskdeck::cli::{self, Command, FilterArgs, TagCommand};
use taskdeck::config::AppConfig;
use taskdeck::persist::{FileKeyValueStore, PersistenceBridge};
use taskdeck::store::{NewTask, TaskStore};
use taskdeck::tasks::TaskError;
use taskdeck::view::{SortKey, StatusFilter, ViewQuery};
use taskdeck_model::{Priority, TagId, TaskId, TasksState};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("taskdeck-flow-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn open(dir: &Path) -> TaskStore<FileKeyValueStore> {
    let bridge = PersistenceBridge::new(FileKeyValueStore::new(dir), "taskState");
    TaskStore::open(bridge, now())
}

fn config(dir: &Path) -> AppConfig {
    AppConfig {
        data_dir: dir.to_path_buf(),
        ..AppConfig::default()
    }
}

fn run(dir: &Path, command: Command) -> Result<String, cli::CliError> {
    let mut store = open(dir);
    let mut out = Vec::new();
    cli::run(command, &mut store, &config(dir), &now(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn first_open_seeds_without_writing() {
    let dir = scratch_dir("seed");
    let store = open(&dir);
    assert_eq!(store.state(), &TasksState::seed(now()));
    assert!(!dir.join("taskState.json").exists());
}

#[test]
fn changes_survive_restart() {
    let dir = scratch_dir("restart");

    let id = {
        let mut store = open(&dir);
        store
            .create_task(
                NewTask {
                    name: "  Book flights ".to_string(),
                    description: "Lisbon, May".to_string(),
                    due_date: now() + Duration::days(5),
                    priority: Priority::VERY_HIGH,
                    tags: [TagId::from("2")].into_iter().collect(),
                },
                now(),
            )
            .unwrap()
    };

    let store = open(&dir);
    let task = store.state().task(&id).unwrap();
    assert_eq!(task.name, "Book flights");
    assert_eq!(task.position, 3);
    assert_eq!(store.state().tasks.len(), 4);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rejected_requests_leave_storage_untouched() {
    let dir = scratch_dir("rejected");
    let mut store = open(&dir);

    let err = store
        .create_task(
            NewTask {
                name: "   ".to_string(),
                description: String::new(),
                due_date: now(),
                priority: Priority::MEDIUM,
                tags: BTreeSet::new(),
            },
            now(),
        )
        .unwrap_err();
    assert_eq!(err, TaskError::NameEmpty);
    assert_eq!(store.state().tasks.len(), 3);
    assert!(!dir.join("taskState.json").exists());
}

#[test]
fn subscribers_follow_store_changes() {
    let dir = scratch_dir("subscribers");
    let mut store = open(&dir);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |state| sink.borrow_mut().push(state.tasks.len()));

    store.delete_task(&TaskId::from("2")).unwrap();
    store.toggle_task(&TaskId::from("1"), now()).unwrap();
    assert!(store.delete_task(&TaskId::from("2")).is_err());

    assert_eq!(*seen.borrow(), vec![2, 2]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn commands_across_runs() {
    let dir = scratch_dir("commands");

    let created = run(
        &dir,
        Command::Tag(TagCommand::Add {
            name: "Errands".to_string(),
            color: "#fde047".to_string(),
        }),
    )
    .unwrap();
    let tag_id = created.trim().strip_prefix("created tag ").unwrap().to_string();

    run(
        &dir,
        Command::Add {
            name: "Post office".to_string(),
            description: String::new(),
            due: "2024-03-09".to_string(),
            priority: 1,
            tags: vec![tag_id.clone()],
        },
    )
    .unwrap();

    let listed = run(
        &dir,
        Command::List(FilterArgs {
            tag: Some(tag_id.clone()),
            ..FilterArgs::default()
        }),
    )
    .unwrap();
    assert!(listed.contains("Post office"));
    assert!(listed.contains("#Errands"));
    assert!(listed.contains("(Very Low)"));

    let stats = run(&dir, Command::Stats { json: true }).unwrap();
    let stats: serde_json::Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["totalTasks"], 4);
    assert_eq!(stats["overdueTasks"], 1);

    run(&dir, Command::Tag(TagCommand::Delete { id: tag_id.clone() })).unwrap();
    let store = open(&dir);
    assert!(store.state().tag(&TagId::from(tag_id.as_str())).is_none());
    assert!(store.state().tasks.iter().all(|t| t.tags.iter().all(|id| id.as_str() != tag_id)));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn move_then_list_by_position() {
    let dir = scratch_dir("move");
    let active = FilterArgs {
        status: Some(StatusFilter::Active),
        sort: Some(SortKey::Position),
        ..FilterArgs::default()
    };

    let out = run(
        &dir,
        Command::Move {
            from: 1,
            to: 0,
            filter: active.clone(),
        },
    )
    .unwrap();
    assert_eq!(out, "moved 1 -> 0\n");

    let store = open(&dir);
    let query = ViewQuery {
        sort: SortKey::Position,
        ..ViewQuery::default()
    };
    let order: Vec<&str> = store.view(&query).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(order, vec!["2", "1", "3"]);

    let err = run(
        &dir,
        Command::Move {
            from: 0,
            to: 5,
            filter: active,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        cli::CliError::Task(TaskError::IndexOutOfRange { index: 5, len: 2 })
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}
