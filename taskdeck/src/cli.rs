//! Command-line front end.
//!
//! Each subcommand turns its arguments into a store call (which builds and
//! dispatches the intent) and renders the resulting projection as plain
//! text. Rendering is intentionally minimal; this is a driver for the core,
//! not a UI.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use taskdeck_model::timestamp::parse_timestamp;
use taskdeck_model::{Priority, TagId, Task, TaskId, TasksState};

use crate::config::AppConfig;
use crate::persist::KeyValueStore;
use crate::store::{NewTask, TaskPatch, TaskStore};
use crate::tasks::TaskError;
use crate::view::{SortKey, StatusFilter, ViewQuery};

/// Errors surfaced to the user by a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The request failed validation.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// A due date argument could not be parsed.
    #[error("invalid due date {0:?} (expected YYYY-MM-DD or an ISO-8601 timestamp)")]
    InvalidDate(String),

    /// Writing output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding JSON output failed.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Filter and sort options shared by `list` and `move`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only tasks whose name or description contains this text.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Completion filter: all, completed, active.
    #[arg(long)]
    pub status: Option<StatusFilter>,

    /// Only tasks with exactly this priority (1-5).
    #[arg(long, short = 'p')]
    pub priority: Option<u8>,

    /// Only tasks carrying this tag id.
    #[arg(long, short = 't')]
    pub tag: Option<String>,

    /// Sort key: dueDate, priority, name, createdAt, position.
    #[arg(long)]
    pub sort: Option<SortKey>,
}

impl FilterArgs {
    /// Builds the view query, filling gaps from the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidPriority`] for a priority outside 1-5.
    pub fn to_query(&self, config: &AppConfig) -> Result<ViewQuery, TaskError> {
        let priority = self
            .priority
            .map(|p| Priority::new(p).ok_or(TaskError::InvalidPriority(p)))
            .transpose()?;
        Ok(ViewQuery {
            search: self.search.clone().unwrap_or_default(),
            status: self.status.unwrap_or(config.default_status),
            priority,
            tag: self.tag.as_deref().map(TagId::from),
            sort: self.sort.unwrap_or(config.default_sort),
        })
    }
}

/// Top-level subcommands.
#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Show tasks, filtered and sorted.
    List(FilterArgs),

    /// Create a task.
    Add {
        /// Task name.
        name: String,
        /// Longer description.
        #[arg(long, short = 'd', default_value = "")]
        description: String,
        /// Due date (YYYY-MM-DD or ISO-8601).
        #[arg(long)]
        due: String,
        /// Priority, 1 (very low) to 5 (very high).
        #[arg(long, short = 'p', default_value_t = 3)]
        priority: u8,
        /// Tag id to attach; repeatable.
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },

    /// Change fields of a task.
    Edit {
        /// Task id.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New description.
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// New due date.
        #[arg(long)]
        due: Option<String>,
        /// New priority.
        #[arg(long, short = 'p')]
        priority: Option<u8>,
        /// Replace tags with these ids; repeatable.
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
        /// Remove all tags.
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Mark a task done, or not done again.
    Toggle {
        /// Task id.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },

    /// Move a task within the filtered list, by displayed index (0-based).
    Move {
        /// Current index in the displayed list.
        from: usize,
        /// Target index in the displayed list.
        to: usize,
        /// The filter the indices refer to.
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show completion statistics.
    Stats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage tags.
    #[command(subcommand)]
    Tag(TagCommand),
}

/// `tag` subcommands.
#[derive(clap::Subcommand, Debug, Clone)]
pub enum TagCommand {
    /// List tags.
    List,
    /// Create a tag.
    Add {
        /// Tag name.
        name: String,
        /// Colour as a hex string.
        #[arg(long, default_value = "#6b7280")]
        color: String,
    },
    /// Rename or recolour a tag.
    Edit {
        /// Tag id.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New colour.
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a tag and remove it from every task.
    Delete {
        /// Tag id.
        id: String,
    },
}

/// Runs `command` against `store`, writing output to `out`.
///
/// `now` supplies both the clock and the timezone used for bare dates and
/// for day boundaries in statistics.
///
/// # Errors
///
/// Returns [`CliError`] if validation fails, a date cannot be parsed, or
/// output cannot be written or flushed.
pub fn run<S, Tz, W>(
    command: Command,
    store: &mut TaskStore<S>,
    config: &AppConfig,
    now: &DateTime<Tz>,
    out: &mut W,
) -> Result<(), CliError>
where
    S: KeyValueStore,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    W: Write,
{
    let utc_now = now.with_timezone(&Utc);
    match command {
        Command::List(filter) => {
            let query = filter.to_query(config)?;
            render_list(store.state(), &store.view(&query), &now.timezone(), out)?;
        }
        Command::Add {
            name,
            description,
            due,
            priority,
            tags,
        } => {
            let draft = NewTask {
                name,
                description,
                due_date: parse_due(&due, &now.timezone())?,
                priority: Priority::from_raw(priority),
                tags: tag_set(&tags),
            };
            let id = store.create_task(draft, utc_now)?;
            writeln!(out, "created {id}")?;
        }
        Command::Edit {
            id,
            name,
            description,
            due,
            priority,
            tags,
            clear_tags,
        } => {
            let tags = if clear_tags {
                Some(BTreeSet::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tag_set(&tags))
            };
            let patch = TaskPatch {
                name,
                description,
                due_date: due.map(|d| parse_due(&d, &now.timezone())).transpose()?,
                priority: priority.map(Priority::from_raw),
                tags,
            };
            store.update_task(&TaskId::from(id.as_str()), patch)?;
            writeln!(out, "updated {id}")?;
        }
        Command::Toggle { id } => {
            let completed = store.toggle_task(&TaskId::from(id.as_str()), utc_now)?;
            let state = if completed { "completed" } else { "reopened" };
            writeln!(out, "{state} {id}")?;
        }
        Command::Delete { id } => {
            store.delete_task(&TaskId::from(id.as_str()))?;
            writeln!(out, "deleted {id}")?;
        }
        Command::Move { from, to, filter } => {
            let query = filter.to_query(config)?;
            if store.move_task(&query, from, to)? {
                writeln!(out, "moved {from} -> {to}")?;
            } else {
                writeln!(out, "nothing to move")?;
            }
        }
        Command::Stats { json } => {
            let stats = store.analytics(now);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                writeln!(out, "total:      {}", stats.total_tasks)?;
                writeln!(
                    out,
                    "completed:  {} ({:.1}%)",
                    stats.completed_tasks, stats.completion_rate
                )?;
                writeln!(out, "overdue:    {}", stats.overdue_tasks)?;
                writeln!(out, "due today:  {}", stats.due_today_tasks)?;
                writeln!(out, "upcoming:   {}", stats.upcoming_tasks)?;
                for (bucket, count) in stats.priority_distribution.iter().enumerate() {
                    let label = u8::try_from(bucket + 1)
                        .ok()
                        .and_then(Priority::new)
                        .and_then(Priority::label)
                        .unwrap_or("?");
                    writeln!(out, "  {label:<10} {count}")?;
                }
            }
        }
        Command::Tag(tag_command) => run_tag(tag_command, store, out)?,
    }
    out.flush()?;
    Ok(())
}

fn run_tag<S: KeyValueStore, W: Write>(
    command: TagCommand,
    store: &mut TaskStore<S>,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        TagCommand::List => {
            for tag in &store.state().tags {
                writeln!(
                    out,
                    "{}  {}  {} (text {})",
                    tag.id,
                    tag.name,
                    tag.color,
                    tag.label_color()
                )?;
            }
        }
        TagCommand::Add { name, color } => {
            let id = store.create_tag(&name, &color)?;
            writeln!(out, "created tag {id}")?;
        }
        TagCommand::Edit { id, name, color } => {
            store.update_tag(&TagId::from(id.as_str()), name.as_deref(), color.as_deref())?;
            writeln!(out, "updated tag {id}")?;
        }
        TagCommand::Delete { id } => {
            store.delete_tag(&TagId::from(id.as_str()))?;
            writeln!(out, "deleted tag {id}")?;
        }
    }
    Ok(())
}

/// Parses a due date. Bare dates mean local midnight in `tz`.
fn parse_due<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<Utc>, CliError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| CliError::InvalidDate(raw.to_string()));
    }
    parse_timestamp(raw).map_err(|_| CliError::InvalidDate(raw.to_string()))
}

fn tag_set(raw: &[String]) -> BTreeSet<TagId> {
    raw.iter().map(|t| TagId::from(t.as_str())).collect()
}

fn render_list<Tz, W>(state: &TasksState, tasks: &[&Task], tz: &Tz, out: &mut W) -> std::io::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    W: Write,
{
    if tasks.is_empty() {
        return writeln!(out, "No tasks match.");
    }
    for task in tasks {
        let check = if task.completed { "[x]" } else { "[ ]" };
        let due = task.due_date.with_timezone(tz).format("%Y-%m-%d");
        let tags: Vec<String> = state
            .resolve_tags(task)
            .iter()
            .map(|tag| format!("#{}", tag.name))
            .collect();
        write!(out, "{check} {}  {}  ({})  due {due}", task.id, task.name, task.priority)?;
        if !tags.is_empty() {
            write!(out, "  {}", tags.join(" "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
