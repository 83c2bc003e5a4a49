//! Persistence bridge between the tracker state and a key-value slot.
//!
//! Defines the [`KeyValueStore`] trait for the backing store plus
//! [`PersistenceBridge`], which binds one slot key and handles the JSON
//! encoding of [`TasksState`].
//!
//! Loading never fails from the caller's point of view: a missing slot,
//! unreadable storage, or undecodable data are all reported as "nothing
//! stored", with the cause logged via `tracing::warn!`.

pub mod file;
pub mod memory;

use std::path::PathBuf;

use taskdeck_model::TasksState;
use taskdeck_model::codec::{self, CodecError};

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Default name of the slot holding the tracker state.
pub const DEFAULT_STORAGE_KEY: &str = "taskState";

/// Errors that can occur while reading or writing the persisted slot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading the backing storage failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the backing storage failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Location that was written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The key cannot be used as a slot name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The stored text could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// A string-to-string store with named slots.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).set(key, value)
    }
}

/// Loads and saves a [`TasksState`] in a single slot of a [`KeyValueStore`].
pub struct PersistenceBridge<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Binds `store` under the given slot key.
    #[must_use]
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The slot key this bridge reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored state, propagating failures.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the slot cannot be read or decoded.
    pub fn try_load(&self) -> Result<Option<TasksState>, PersistError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(codec::decode(&raw)?))
    }

    /// Loads the stored state.
    ///
    /// Returns `None` when nothing is stored or when the stored value cannot
    /// be read or decoded; the latter is logged and otherwise swallowed.
    #[must_use]
    pub fn load(&self) -> Option<TasksState> {
        match self.try_load() {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "failed to load stored tasks, ignoring stored value"
                );
                None
            }
        }
    }

    /// Saves the state, propagating failures.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or writing fails.
    pub fn try_save(&self, state: &TasksState) -> Result<(), PersistError> {
        let json = codec::encode(state)?;
        self.store.set(&self.key, &json)
    }

    /// Saves the state, logging instead of propagating failures.
    pub fn save(&self, state: &TasksState) {
        if let Err(err) = self.try_save(state) {
            tracing::warn!(
                key = %self.key,
                error = %err,
                "failed to save tasks, in-memory state is ahead of storage"
            );
        }
    }
}
