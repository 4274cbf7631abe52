//! In-process session store.

use super::{BackendType, KeyValueStore, StoreOp};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Key-value store that lives only as long as the process.
///
/// Reads and writes can be switched to fail, to exercise the paths where
/// the durable store is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Make subsequent reads and/or writes fail.
    pub fn set_failing(&mut self, reads: bool, writes: bool) {
        self.fail_reads = reads;
        self.fail_writes = writes;
    }

    /// Check whether `key` is present, bypassing failure injection.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Read `key`, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(Error::PersistStoreUnavailable(
                "memory store read failure".to_string(),
            ));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn apply(&mut self, ops: &[StoreOp]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::PersistStoreUnavailable(
                "memory store write failure".to_string(),
            ));
        }
        for op in ops {
            match op {
                StoreOp::Set { key, value } => {
                    self.entries.insert(key.clone(), value.clone());
                }
                StoreOp::Remove { key } => {
                    self.entries.remove(key);
                }
            }
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Memory
    }
}
