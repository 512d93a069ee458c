use std::fmt::Debug;

use crate::error::StoreError;
use crate::kind::{PrimitiveKind, StoredValue, StringSet};

/// Whether a write returns before or after it reaches durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    /// Queued in memory and flushed in the background; failures are not reported.
    #[default]
    Buffered,
    /// Flushed before the write returns; the flush result is returned.
    Immediate,
}

/// One pending modification collected by an [`Editor`].
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Put(String, StoredValue),
    Remove(String),
}

/// The host key-value store preferences are read from and written to.
///
/// Implementors provide raw access; the typed getters are derived from
/// [`read`](SharedStore::read). A getter fails with
/// [`StoreError::TypeMismatch`] when the key holds another kind.
pub trait SharedStore: Send + Sync + Debug {
    /// Returns the value currently held under `key`.
    fn read(&self, key: &str) -> Option<StoredValue>;

    /// Applies `changes` and flushes them before returning.
    fn commit(&self, changes: Vec<Change>) -> Result<(), StoreError>;

    /// Applies `changes` in memory and schedules the flush.
    fn apply(&self, changes: Vec<Change>);

    fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    fn get_boolean(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        match self.read(key) {
            None => Ok(default),
            Some(StoredValue::Boolean(value)) => Ok(value),
            Some(other) => Err(mismatch(key, PrimitiveKind::Boolean, &other)),
        }
    }

    fn get_int(&self, key: &str, default: i32) -> Result<i32, StoreError> {
        match self.read(key) {
            None => Ok(default),
            Some(StoredValue::Int(value)) => Ok(value),
            Some(other) => Err(mismatch(key, PrimitiveKind::Int, &other)),
        }
    }

    fn get_long(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        match self.read(key) {
            None => Ok(default),
            Some(StoredValue::Long(value)) => Ok(value),
            Some(other) => Err(mismatch(key, PrimitiveKind::Long, &other)),
        }
    }

    fn get_float(&self, key: &str, default: f32) -> Result<f32, StoreError> {
        match self.read(key) {
            None => Ok(default),
            Some(StoredValue::Float(value)) => Ok(value),
            Some(other) => Err(mismatch(key, PrimitiveKind::Float, &other)),
        }
    }

    fn get_string(&self, key: &str, default: Option<String>) -> Result<Option<String>, StoreError> {
        match self.read(key) {
            None => Ok(default),
            Some(StoredValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(key, PrimitiveKind::String, &other)),
        }
    }

    fn get_string_set(
        &self,
        key: &str,
        default: Option<StringSet>,
    ) -> Result<Option<StringSet>, StoreError> {
        match self.read(key) {
            None => Ok(default),
            Some(StoredValue::StringSet(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(key, PrimitiveKind::StringSet, &other)),
        }
    }
}

fn mismatch(key: &str, expected: PrimitiveKind, found: &StoredValue) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Collects writes against a store and hands them over in one batch.
///
/// Putting `None` for a string or string-set key removes it.
#[derive(Debug)]
pub struct Editor<'a> {
    store: &'a dyn SharedStore,
    changes: Vec<Change>,
}

impl<'a> Editor<'a> {
    pub fn new(store: &'a dyn SharedStore) -> Self {
        Editor {
            store,
            changes: Vec::new(),
        }
    }

    pub fn put_boolean(&mut self, key: &str, value: bool) -> &mut Self {
        self.put(key, StoredValue::Boolean(value))
    }

    pub fn put_int(&mut self, key: &str, value: i32) -> &mut Self {
        self.put(key, StoredValue::Int(value))
    }

    pub fn put_long(&mut self, key: &str, value: i64) -> &mut Self {
        self.put(key, StoredValue::Long(value))
    }

    pub fn put_float(&mut self, key: &str, value: f32) -> &mut Self {
        self.put(key, StoredValue::Float(value))
    }

    pub fn put_string(&mut self, key: &str, value: Option<String>) -> &mut Self {
        match value {
            Some(value) => self.put(key, StoredValue::String(value)),
            None => self.remove(key),
        }
    }

    pub fn put_string_set(&mut self, key: &str, value: Option<StringSet>) -> &mut Self {
        match value {
            Some(value) => self.put(key, StoredValue::StringSet(value)),
            None => self.remove(key),
        }
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.changes.push(Change::Remove(key.to_string()));
        self
    }

    fn put(&mut self, key: &str, value: StoredValue) -> &mut Self {
        self.changes.push(Change::Put(key.to_string(), value));
        self
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Writes the batch synchronously and reports the outcome.
    pub fn commit(self) -> Result<(), StoreError> {
        self.store.commit(self.changes)
    }

    /// Writes the batch in the background.
    pub fn apply(self) {
        self.store.apply(self.changes)
    }

    /// Commits or applies depending on `durability`.
    pub fn finish(self, durability: Durability) -> Result<(), StoreError> {
        match durability {
            Durability::Immediate => self.commit(),
            Durability::Buffered => {
                self.apply();
                Ok(())
            }
        }
    }
}
