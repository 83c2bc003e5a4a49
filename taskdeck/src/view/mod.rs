//! Read-only projections over the tracker state.
//!
//! - [`pipeline`]: the filtered, sorted task list shown to the user.
//! - [`analytics`]: completion and due-date aggregates over all tasks.
//! - [`reorder`]: turns a drag from one displayed index to another into
//!   a `ReorderTasks` intent.

pub mod analytics;
pub mod pipeline;
pub mod reorder;

pub use analytics::{Analytics, compute_analytics};
pub use pipeline::{NameCollator, SortKey, StatusFilter, ViewQuery, derive_view};
pub use reorder::{build_reorder_intent, reorder};
