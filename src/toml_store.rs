//! A preferences store kept in memory and persisted as one TOML document.
//!
//! Reads never touch the backend. Immediate writes persist the document before
//! returning; buffered writes persist it from a background thread. Every flush
//! writes the newest in-memory state, and a flush that finds nothing newer than
//! the last persisted generation does nothing, so a late background flush can
//! never roll the document back.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, Weak};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::kind::StoredValue;
use crate::store::{Change, SharedStore};

type Entries = BTreeMap<String, StoredValue>;

#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    entries: Entries,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    entries: &'a Entries,
}

/// Stores opened by location, so one location maps to one live instance.
static OPEN_STORES: Lazy<Mutex<HashMap<String, Weak<TomlStore>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

#[derive(Debug)]
struct State {
    entries: Entries,
    generation: u64,
}

#[derive(Debug)]
struct Inner {
    name: String,
    document: String,
    state: RwLock<State>,
    persisted: Mutex<u64>,
    flush_pending: AtomicBool,
    backend: Option<Box<dyn Backend>>,
}

/// The bundled [`SharedStore`] implementation.
#[derive(Debug)]
pub struct TomlStore {
    inner: Arc<Inner>,
    #[cfg(not(target_arch = "wasm32"))]
    _scratch_dir: Option<tempfile::TempDir>,
}

impl TomlStore {
    /// A store that is never persisted.
    pub fn in_memory(name: &str) -> Self {
        Self::build(name, None, Entries::new())
    }

    /// Loads `<name>.toml` from `backend`, starting empty if it does not exist yet.
    /// Callers outside this module go through [`shared`](Self::shared) so that a
    /// location is never loaded twice.
    fn load(name: &str, backend: Box<dyn Backend>) -> Result<Self, StoreError> {
        let document = document_name(name);
        let location = backend.location(&document);
        let entries = match backend.read(&document)? {
            Some(contents) => {
                info!(location = %location, "loading preferences");
                toml::from_str::<Document>(&contents)
                    .map_err(|source| StoreError::Decode { location, source })?
                    .entries
            }
            None => {
                debug!(location = %location, "no preferences document yet");
                Entries::new()
            }
        };
        Ok(Self::build(name, Some(backend), entries))
    }

    fn build(name: &str, backend: Option<Box<dyn Backend>>, entries: Entries) -> Self {
        TomlStore {
            inner: Arc::new(Inner {
                name: name.to_string(),
                document: document_name(name),
                state: RwLock::new(State {
                    entries,
                    generation: 0,
                }),
                persisted: Mutex::new(0),
                flush_pending: AtomicBool::new(false),
                backend,
            }),
            #[cfg(not(target_arch = "wasm32"))]
            _scratch_dir: None,
        }
    }

    /// Opens `<name>.toml` in the configuration directory for `namespace`,
    /// e.g. `"com.example.App"`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(namespace: &str, name: &str) -> Result<Arc<Self>, StoreError> {
        let project = directories::ProjectDirs::from(namespace, "", "")
            .ok_or_else(|| StoreError::NoConfigDir(namespace.to_string()))?;
        Self::open_in(project.config_dir(), name)
    }

    /// Opens `<name>.toml` in the `localStorage` area for `namespace`.
    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    pub fn open(namespace: &str, name: &str) -> Result<Arc<Self>, StoreError> {
        Self::shared(
            Box::new(crate::backend::wasm::LocalStorageBackend::new(namespace)),
            name,
        )
    }

    /// Opens `<name>.toml` inside `directory`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_in(
        directory: impl AsRef<std::path::Path>,
        name: &str,
    ) -> Result<Arc<Self>, StoreError> {
        Self::shared(
            Box::new(crate::backend::native::FileBackend::new(directory)),
            name,
        )
    }

    /// Returns the live store for the backend location, loading it if needed.
    ///
    /// Every public constructor that persists to a shared location ends up
    /// here. When the location is already open, `backend` is dropped and the
    /// live instance is returned.
    pub fn shared(backend: Box<dyn Backend>, name: &str) -> Result<Arc<Self>, StoreError> {
        let location = backend.location(&document_name(name));
        let mut open = OPEN_STORES.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = open.get(&location).and_then(Weak::upgrade) {
            return Ok(store);
        }
        open.retain(|_, store| store.strong_count() > 0);

        let store = Arc::new(Self::load(name, backend)?);
        open.insert(location, Arc::downgrade(&store));
        Ok(store)
    }

    /// A store persisted to a private temporary directory, removed on drop.
    /// Instances never share state with each other.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_testing(name: &str) -> Result<Self, StoreError> {
        let dir = tempfile::Builder::new().prefix("typed_prefs").tempdir()?;
        let backend = crate::backend::native::FileBackend::new(dir.path());
        let mut store = Self::load(name, Box::new(backend))?;
        store._scratch_dir = Some(dir);
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Where the document lives, `None` for an in-memory store.
    pub fn location(&self) -> Option<String> {
        self.inner
            .backend
            .as_ref()
            .map(|backend| backend.location(&self.inner.document))
    }

    /// Writes any buffered changes now.
    pub fn sync(&self) -> Result<(), StoreError> {
        self.inner.flush()
    }

    /// The document as it would be persisted.
    pub fn to_toml(&self) -> Result<String, StoreError> {
        encode(&self.inner.read_state().entries)
    }

    fn schedule_flush(&self) {
        if self.inner.backend.is_none() || self.inner.flush_pending.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let spawned = std::thread::Builder::new()
            .name("typed-prefs-flush".to_string())
            .spawn(move || inner.run_pending_flush());
        if let Err(e) = spawned {
            debug!(error = %e, "cannot spawn flush thread, flushing inline");
            self.inner.run_pending_flush();
        }
    }
}

/// Dropping the store flushes anything still buffered.
impl Drop for TomlStore {
    fn drop(&mut self) {
        if let Err(e) = self.inner.flush() {
            warn!(document = %self.inner.document, error = %e, "final preferences flush failed");
        }
    }
}

impl Inner {
    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_persisted(&self) -> MutexGuard<'_, u64> {
        self.persisted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_changes(&self, changes: Vec<Change>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        for change in changes {
            match change {
                Change::Put(key, value) => {
                    state.entries.insert(key, value);
                }
                Change::Remove(key) => {
                    state.entries.remove(&key);
                }
            }
        }
        state.generation += 1;
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let mut persisted = self.lock_persisted();
        let (generation, contents) = {
            let state = self.read_state();
            if state.generation <= *persisted {
                return Ok(());
            }
            (state.generation, encode(&state.entries)?)
        };
        backend.write(&self.document, &contents)?;
        *persisted = generation;
        debug!(document = %self.document, generation, "preferences flushed");
        Ok(())
    }

    fn run_pending_flush(&self) {
        self.flush_pending.store(false, Ordering::SeqCst);
        if let Err(e) = self.flush() {
            warn!(document = %self.document, error = %e, "background preferences flush failed");
        }
    }
}

impl SharedStore for TomlStore {
    fn read(&self, key: &str) -> Option<StoredValue> {
        self.inner.read_state().entries.get(key).cloned()
    }

    fn commit(&self, changes: Vec<Change>) -> Result<(), StoreError> {
        debug!(store = %self.inner.name, changes = changes.len(), "commit");
        self.inner.apply_changes(changes);
        self.inner.flush()
    }

    fn apply(&self, changes: Vec<Change>) {
        debug!(store = %self.inner.name, changes = changes.len(), "apply");
        self.inner.apply_changes(changes);
        self.schedule_flush();
    }
}

fn document_name(name: &str) -> String {
    format!("{name}.toml")
}

fn encode(entries: &Entries) -> Result<String, StoreError> {
    Ok(toml::to_string(&DocumentRef { entries })?)
}
