//! Preference-backed store: one named file, one key, an unordered string set.
//!
//! # Responsibility
//! - Round-trip the description collection stored under a single key.
//! - Adapt that set to the identity-addressed `TaskStore` contract.
//!
//! # Invariants
//! - `save()` collapses duplicates; the file never holds the same value twice.
//! - Keys other than the task key are preserved untouched.
//! - Files are replaced via temp file + rename, never written in place.
//! - Task ids handed out here are session-local and never persisted.

use super::{StoreError, StoreResult, TaskStore};
use crate::config::StoreBackend;
use crate::model::task::{normalize_description, Task, TaskId};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A named preference file holding a description set under one key.
#[derive(Debug, Clone)]
pub struct PreferenceFile {
    path: PathBuf,
    key: String,
}

impl PreferenceFile {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all stored descriptions; empty if the file or key is missing.
    ///
    /// Order is not part of the contract.
    pub fn load(&self) -> StoreResult<Vec<String>> {
        let entries = self.read_entries()?;
        let Some(value) = entries.get(&self.key) else {
            return Ok(Vec::new());
        };

        let Value::Array(items) = value else {
            return Err(self.format_error(format!("key `{}` is not an array", self.key)));
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(text) => Ok(text.clone()),
                other => Err(self.format_error(format!(
                    "key `{}` holds a non-string entry of type {}",
                    self.key,
                    json_type_name(other)
                ))),
            })
            .collect()
    }

    /// Overwrites the whole stored collection with `all`, deduplicated.
    pub fn save<I, S>(&self, all: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = all.into_iter().map(|s| s.as_ref().to_string()).collect();
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Format { .. }) => {
                warn!(
                    "event=prefs_save module=store status=recover reason=malformed_file path={}",
                    self.path.display()
                );
                Map::new()
            }
            Err(err) => return Err(err),
        };
        let count = set.len();
        entries.insert(
            self.key.clone(),
            Value::Array(set.into_iter().map(Value::String).collect()),
        );

        self.write_entries(&entries)?;
        debug!("event=prefs_save module=store status=ok count={count}");
        Ok(())
    }

    fn read_entries(&self) -> StoreResult<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(other) => Err(self.format_error(format!(
                "top-level value is {}, expected object",
                json_type_name(&other)
            ))),
            Err(err) => Err(self.format_error(err.to_string())),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> StoreResult<()> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|err| self.format_error(err.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, body).map_err(io_error)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_error)?;
        Ok(())
    }

    fn format_error(&self, message: String) -> StoreError {
        StoreError::Format {
            path: self.path.clone(),
            message,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `TaskStore` over a [`PreferenceFile`].
///
/// Keeps a session cache mirroring the file so tasks can be addressed by id;
/// every mutation rewrites the full set.
#[derive(Debug)]
pub struct PreferenceTaskStore {
    file: PreferenceFile,
    cache: Vec<Task>,
    next_id: TaskId,
}

impl PreferenceTaskStore {
    pub fn new(file: PreferenceFile) -> Self {
        Self {
            file,
            cache: Vec::new(),
            next_id: 1,
        }
    }

    pub fn file(&self) -> &PreferenceFile {
        &self.file
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn persist(&self) -> StoreResult<()> {
        self.file
            .save(self.cache.iter().map(|task| task.description.as_str()))
    }

    fn position_of(&self, id: TaskId) -> Option<usize> {
        self.cache.iter().position(|task| task.id == id)
    }

    fn is_taken(&self, description: &str, except: Option<TaskId>) -> bool {
        self.cache
            .iter()
            .any(|task| task.description == description && Some(task.id) != except)
    }
}

impl TaskStore for PreferenceTaskStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Preferences
    }

    fn load(&mut self) -> StoreResult<Vec<Task>> {
        let raw = self.file.load()?;
        let raw_count = raw.len();

        // Older files may hold untrimmed or blank values and duplicates.
        let mut seen = BTreeSet::new();
        let mut normalized = false;
        let mut descriptions = Vec::with_capacity(raw_count);
        for value in raw {
            match normalize_description(&value) {
                Ok(description) if seen.insert(description.clone()) => {
                    normalized |= description != value;
                    descriptions.push(description);
                }
                _ => normalized = true,
            }
        }

        self.cache = descriptions
            .into_iter()
            .map(|description| Task::new(self.allocate_id(), description))
            .collect();

        if normalized {
            warn!(
                "event=prefs_load module=store status=normalized raw_count={raw_count} kept={}",
                self.cache.len()
            );
            self.persist()?;
        }

        info!(
            "event=prefs_load module=store status=ok count={}",
            self.cache.len()
        );
        Ok(self.cache.clone())
    }

    fn add(&mut self, description: &str) -> StoreResult<TaskId> {
        let description = normalize_description(description)?;
        if self.is_taken(&description, None) {
            return Err(StoreError::DuplicateDescription);
        }

        let id = self.allocate_id();
        self.cache.push(Task::new(id, description));
        if let Err(err) = self.persist() {
            self.cache.pop();
            return Err(err);
        }
        Ok(id)
    }

    fn update(&mut self, id: TaskId, description: &str) -> StoreResult<bool> {
        let description = normalize_description(description)?;
        let Some(index) = self.position_of(id) else {
            return Ok(false);
        };
        if self.is_taken(&description, Some(id)) {
            return Err(StoreError::DuplicateDescription);
        }

        let previous = std::mem::replace(&mut self.cache[index].description, description);
        if let Err(err) = self.persist() {
            self.cache[index].description = previous;
            return Err(err);
        }
        Ok(true)
    }

    fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        let Some(index) = self.position_of(id) else {
            return Ok(());
        };

        let removed = self.cache.remove(index);
        if let Err(err) = self.persist() {
            self.cache.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }
}
