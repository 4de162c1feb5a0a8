// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value store kept as a single JSON object on disk.

use crate::db::KeyValueStore;
use crate::error::{AppError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON file store.
///
/// The file is re-read on every `get` and replaced atomically (write and
/// fsync a sibling temp file, then rename) on every `set`. The mutex serializes
/// read-modify-write cycles within the process.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty document.
    fn read_document(&self) -> Result<Map<String, Value>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(AppError::PersistenceRead(e.to_string())),
        };

        if data.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::PersistenceRead(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(AppError::PersistenceRead(e.to_string())),
        }
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<()> {
        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::PersistenceWrite(e.to_string()))?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file =
            fs::File::create(&tmp).map_err(|e| AppError::PersistenceWrite(e.to_string()))?;
        file.write_all(&data)
            .and_then(|_| file.sync_all())
            .map_err(|e| AppError::PersistenceWrite(e.to_string()))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| AppError::PersistenceWrite(e.to_string()))
    }

    /// Read the document for modification. A corrupt file is replaced
    /// rather than blocking every later write.
    fn document_for_update(&self) -> Map<String, Value> {
        self.read_document().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable store");
            Map::new()
        })
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.guard();
        Ok(self.read_document()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.guard();
        let mut doc = self.document_for_update();
        doc.insert(key.to_string(), value);
        self.write_document(&doc)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard();
        let mut doc = self.document_for_update();
        if doc.remove(key).is_some() {
            self.write_document(&doc)?;
        }
        Ok(())
    }
}
