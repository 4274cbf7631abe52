//! File-backed session store (`state.kdl`).
//!
//! Each key is one KDL node with a single string argument:
//!
//! ```kdl
//! isDevMode "false"
//! apiKey "sk-live-xxxxxxxx"
//! ```
//!
//! The whole file is rewritten through a temporary file in the same
//! directory and renamed into place, so a batch is either fully visible or
//! not at all.

use super::{BackendType, KeyValueStore, STATE_FILE, StoreOp};
use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Required permissions for state.kdl (Unix: 0600, owner read/write only).
#[cfg(unix)]
pub const STATE_FILE_MODE: u32 = 0o600;

/// Durable key-value store kept in a KDL file.
#[derive(Debug, Clone)]
pub struct KdlFileStore {
    path: PathBuf,
}

impl KdlFileStore {
    /// Open the store at `<data_dir>/state.kdl`. The file is created lazily.
    pub fn open(data_dir: &Path) -> Self {
        Self::at(data_dir.join(STATE_FILE))
    }

    /// Open the store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> Error {
        Error::PersistStoreUnavailable(format!("{}: {}", self.path.display(), err))
    }

    fn read_document(&self) -> Result<KdlDocument> {
        if !self.path.exists() {
            return Ok(KdlDocument::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        content
            .parse::<KdlDocument>()
            .map_err(|e| self.unavailable(e))
    }

    fn write_document(&self, doc: &KdlDocument) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| self.unavailable(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.unavailable(e))?;
        tmp.write_all(doc.to_string().as_bytes())
            .map_err(|e| self.unavailable(e))?;
        tmp.as_file().sync_all().map_err(|e| self.unavailable(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(STATE_FILE_MODE))
                .map_err(|e| self.unavailable(e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| self.unavailable(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for KdlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let doc = self.read_document()?;
        Ok(doc
            .get(key)
            .and_then(|node| node.entries().first())
            .and_then(|entry| value_to_string(entry.value())))
    }

    fn apply(&mut self, ops: &[StoreOp]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut doc = self.read_document()?;
        for op in ops {
            doc.nodes_mut().retain(|node| node.name().value() != op.key());
            if let StoreOp::Set { key, value } = op {
                let mut node = KdlNode::new(key.as_str());
                node.push(KdlEntry::new(KdlValue::String(value.clone())));
                doc.nodes_mut().push(node);
            }
        }
        doc.autoformat();

        self.write_document(&doc)?;
        tracing::debug!(path = %self.path.display(), ops = ops.len(), "session store written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn backend_type(&self) -> BackendType {
        BackendType::File
    }
}

/// Hand-edited files may carry bare booleans or numbers instead of strings.
fn value_to_string(value: &KdlValue) -> Option<String> {
    match value {
        KdlValue::String(s) => Some(s.clone()),
        KdlValue::Bool(b) => Some(b.to_string()),
        KdlValue::Integer(i) => Some(i.to_string()),
        KdlValue::Float(f) => Some(f.to_string()),
        KdlValue::Null => None,
    }
}
