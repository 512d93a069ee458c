use std::sync::Arc;

use crate::preference::{Preference, PreferenceSpec};
use crate::store::SharedStore;

/// Hands out accessors that all read and write one store.
///
/// Structs generated by [`shared_prefs!`](crate::shared_prefs) wrap one of
/// these; it can also be used directly:
///
/// ```rust
/// use std::sync::Arc;
/// use typed_prefs::{PreferenceSpec, SharedPrefs, TomlStore};
///
/// let prefs = SharedPrefs::new(Arc::new(TomlStore::in_memory("settings")));
/// let enabled = prefs.bind(PreferenceSpec::boolean(false).immediate(), "enabled");
/// assert!(!enabled.get().unwrap());
/// enabled.set(true).unwrap();
/// assert!(enabled.get().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct SharedPrefs {
    store: Arc<dyn SharedStore>,
}

impl SharedPrefs {
    pub fn new(store: Arc<dyn SharedStore>) -> Self {
        SharedPrefs { store }
    }

    pub fn store(&self) -> &Arc<dyn SharedStore> {
        &self.store
    }

    /// Binds `spec` to this store. `name` becomes the key unless `spec` carries
    /// an explicit one.
    pub fn bind<T>(&self, spec: PreferenceSpec<T>, name: &str) -> Preference<T> {
        spec.bind(Arc::clone(&self.store), name)
    }
}
