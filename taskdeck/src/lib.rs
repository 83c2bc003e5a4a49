//! `taskdeck` — local-first task tracker.
//!
//! The state model lives in `taskdeck-model`. This crate holds the pure
//! mutation engine ([`tasks`]), the derived views ([`view`]), persistence
//! to a key-value slot ([`persist`]), the [`store`] that ties them together,
//! and a thin command-line front end ([`cli`]).

pub mod cli;
pub mod config;
pub mod persist;
pub mod store;
pub mod tasks;
pub mod view;
