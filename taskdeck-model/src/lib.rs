//! Entity model and persisted layout for `taskdeck`.
//!
//! Everything here is plain data: tasks, tags, the aggregate
//! [`TasksState`](state::TasksState), and the JSON codec used to store it.

pub mod codec;
pub mod state;
pub mod tag;
pub mod task;
pub mod timestamp;

pub use state::TasksState;
pub use tag::{Tag, TagId};
pub use task::{Priority, Task, TaskId};
