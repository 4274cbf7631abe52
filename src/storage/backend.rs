//! Key-value store trait and the available backend types.

use crate::Result;

/// A single mutation in a store batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// Insert or replace `key` with `value`.
    Set { key: String, value: String },
    /// Delete `key` if it exists.
    Remove { key: String },
}

impl StoreOp {
    /// Build a `Set` operation.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a `Remove` operation.
    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    /// The key this operation touches.
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// Durable string key-value map that outlives the process.
///
/// Writes go through [`KeyValueStore::apply`], which must make a whole batch
/// visible at once: a reader never observes half of a batch.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply a batch of operations atomically.
    fn apply(&mut self, ops: &[StoreOp]) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Store a single value.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(&[StoreOp::set(key, value)])
    }

    /// Delete a single value.
    fn remove(&mut self, key: &str) -> Result<()> {
        self.apply(&[StoreOp::remove(key)])
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn apply(&mut self, ops: &[StoreOp]) -> Result<()> {
        (**self).apply(ops)
    }

    fn location(&self) -> String {
        (**self).location()
    }

    fn backend_type(&self) -> BackendType {
        (**self).backend_type()
    }
}

/// Available store backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `state.kdl` in the data directory (default)
    File,
    /// In-process map, forgotten at exit
    Memory,
}

impl BackendType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
