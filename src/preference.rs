//! Typed accessors and the constructors that describe them.
//!
//! A [`PreferenceSpec`] says what is stored (kind, default, optional
//! transcoder, durability, optional explicit key). Binding it to a store and a
//! name gives a [`Preference`], whose key is the explicit key if one was given
//! and the binding name otherwise.

use std::fmt;
use std::sync::Arc;

use crate::error::StoreError;
use crate::kind::{Primitive, PrimitiveKind, StringSet};
use crate::store::{Durability, Editor, SharedStore};
use crate::transcoder::Transcoder;

type ReadFn<T> = Arc<dyn Fn(&dyn SharedStore, &str) -> Result<T, StoreError> + Send + Sync>;
type WriteFn<T> = Arc<dyn Fn(&mut Editor<'_>, &str, T) + Send + Sync>;

/// A preference that has not been bound to a store yet.
pub struct PreferenceSpec<T> {
    key: Option<String>,
    durability: Durability,
    kind: PrimitiveKind,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T> PreferenceSpec<T> {
    fn from_parts(kind: PrimitiveKind, read: ReadFn<T>, write: WriteFn<T>) -> Self {
        PreferenceSpec {
            key: None,
            durability: Durability::default(),
            kind,
            read,
            write,
        }
    }

    /// Uses `key` instead of the binding name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    /// Shorthand for `durability(Durability::Immediate)`.
    pub fn immediate(self) -> Self {
        self.durability(Durability::Immediate)
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Binds to `store`. The key is fixed here and never changes afterwards.
    pub fn bind(self, store: Arc<dyn SharedStore>, name: &str) -> Preference<T> {
        let key = self.key.unwrap_or_else(|| name.to_string());
        tracing::trace!(
            key = %key,
            kind = %self.kind,
            durability = ?self.durability,
            "bound preference"
        );
        Preference {
            store,
            key,
            durability: self.durability,
            kind: self.kind,
            read: self.read,
            write: self.write,
        }
    }
}

impl<T: Primitive> PreferenceSpec<T> {
    fn primitive(default: T) -> Self {
        Self::from_parts(
            T::KIND,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                T::read(store, key, default.clone())
            }),
            Arc::new(|editor: &mut Editor<'_>, key: &str, value: T| {
                T::write(editor, key, value)
            }),
        )
    }
}

impl PreferenceSpec<bool> {
    pub fn boolean(default: bool) -> Self {
        Self::primitive(default)
    }
}

impl PreferenceSpec<i32> {
    pub fn int(default: i32) -> Self {
        Self::primitive(default)
    }
}

impl PreferenceSpec<i64> {
    pub fn long(default: i64) -> Self {
        Self::primitive(default)
    }
}

impl PreferenceSpec<f32> {
    pub fn float(default: f32) -> Self {
        Self::primitive(default)
    }
}

impl PreferenceSpec<Option<String>> {
    /// A nullable string; reads `None` while the key is absent.
    pub fn string() -> Self {
        Self::primitive(None)
    }
}

impl PreferenceSpec<String> {
    /// A string that reads `default` while the key is absent.
    pub fn string_or(default: impl Into<String>) -> Self {
        let default = default.into();
        Self::from_parts(
            PrimitiveKind::String,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                Ok(store.get_string(key, None)?.unwrap_or_else(|| default.clone()))
            }),
            Arc::new(|editor: &mut Editor<'_>, key: &str, value: String| {
                editor.put_string(key, Some(value));
            }),
        )
    }
}

impl PreferenceSpec<Option<StringSet>> {
    /// A nullable string set; reads `None` while the key is absent.
    pub fn string_set() -> Self {
        Self::primitive(None)
    }
}

impl PreferenceSpec<StringSet> {
    /// A string set that reads `default` while the key is absent.
    pub fn string_set_or(default: StringSet) -> Self {
        Self::from_parts(
            PrimitiveKind::StringSet,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                Ok(store
                    .get_string_set(key, None)?
                    .unwrap_or_else(|| default.clone()))
            }),
            Arc::new(|editor: &mut Editor<'_>, key: &str, value: StringSet| {
                editor.put_string_set(key, Some(value));
            }),
        )
    }
}

impl<T: Send + Sync + 'static> PreferenceSpec<T> {
    /// The absent-key default goes through the store's own default mechanism:
    /// it is encoded, handed to the native read, and decoded with the result.
    fn mapped_primitive<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T>,
        C::Stored: Primitive,
    {
        let transcoder = Arc::new(transcoder);
        let stored_default = transcoder.to_stored(&default);
        let reader = Arc::clone(&transcoder);
        Self::from_parts(
            <C::Stored as Primitive>::KIND,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                let stored = <C::Stored as Primitive>::read(store, key, stored_default.clone())?;
                Ok(reader.from_stored(stored))
            }),
            Arc::new(move |editor: &mut Editor<'_>, key: &str, value: T| {
                <C::Stored as Primitive>::write(editor, key, transcoder.to_stored(&value));
            }),
        )
    }

    pub fn mapped_boolean<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = bool>,
    {
        Self::mapped_primitive(default, transcoder)
    }

    pub fn mapped_int<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = i32>,
    {
        Self::mapped_primitive(default, transcoder)
    }

    pub fn mapped_long<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = i64>,
    {
        Self::mapped_primitive(default, transcoder)
    }

    pub fn mapped_float<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = f32>,
    {
        Self::mapped_primitive(default, transcoder)
    }
}

impl<T: Clone + Send + Sync + 'static> PreferenceSpec<T> {
    /// Reads `default` while the key is absent; the default is never encoded.
    pub fn mapped_string_or<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = String>,
    {
        let transcoder = Arc::new(transcoder);
        let reader = Arc::clone(&transcoder);
        Self::from_parts(
            PrimitiveKind::String,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                Ok(match store.get_string(key, None)? {
                    Some(stored) => reader.from_stored(stored),
                    None => default.clone(),
                })
            }),
            Arc::new(move |editor: &mut Editor<'_>, key: &str, value: T| {
                editor.put_string(key, Some(transcoder.to_stored(&value)));
            }),
        )
    }

    /// Reads `default` while the key is absent; the default is never encoded.
    pub fn mapped_string_set_or<C>(default: T, transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = StringSet>,
    {
        let transcoder = Arc::new(transcoder);
        let reader = Arc::clone(&transcoder);
        Self::from_parts(
            PrimitiveKind::StringSet,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                Ok(match store.get_string_set(key, None)? {
                    Some(stored) => reader.from_stored(stored),
                    None => default.clone(),
                })
            }),
            Arc::new(move |editor: &mut Editor<'_>, key: &str, value: T| {
                editor.put_string_set(key, Some(transcoder.to_stored(&value)));
            }),
        )
    }
}

impl<T: Send + Sync + 'static> PreferenceSpec<Option<T>> {
    /// Reads `None` while the key is absent. Setting `None` clears the key.
    pub fn mapped_string<C>(transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = String>,
    {
        let transcoder = Arc::new(transcoder);
        let reader = Arc::clone(&transcoder);
        Self::from_parts(
            PrimitiveKind::String,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                Ok(store
                    .get_string(key, None)?
                    .map(|stored| reader.from_stored(stored)))
            }),
            Arc::new(move |editor: &mut Editor<'_>, key: &str, value: Option<T>| {
                editor.put_string(key, value.map(|value| transcoder.to_stored(&value)));
            }),
        )
    }

    /// Reads `None` while the key is absent. Setting `None` clears the key.
    pub fn mapped_string_set<C>(transcoder: C) -> Self
    where
        C: Transcoder<Value = T, Stored = StringSet>,
    {
        let transcoder = Arc::new(transcoder);
        let reader = Arc::clone(&transcoder);
        Self::from_parts(
            PrimitiveKind::StringSet,
            Arc::new(move |store: &dyn SharedStore, key: &str| {
                Ok(store
                    .get_string_set(key, None)?
                    .map(|stored| reader.from_stored(stored)))
            }),
            Arc::new(move |editor: &mut Editor<'_>, key: &str, value: Option<T>| {
                editor.put_string_set(key, value.map(|value| transcoder.to_stored(&value)));
            }),
        )
    }
}

impl<T> fmt::Debug for PreferenceSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceSpec")
            .field("key", &self.key)
            .field("durability", &self.durability)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A read-write accessor for one named slot.
pub struct Preference<T> {
    store: Arc<dyn SharedStore>,
    key: String,
    durability: Durability,
    kind: PrimitiveKind,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T> Preference<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Returns the stored value, or the default while the key is absent.
    pub fn get(&self) -> Result<T, StoreError> {
        (self.read)(self.store.as_ref(), &self.key)
    }

    /// Stores `value`.
    ///
    /// With [`Durability::Immediate`] the flush result is returned. Buffered
    /// writes always return `Ok`; a later flush failure is only logged.
    pub fn set(&self, value: T) -> Result<(), StoreError> {
        let mut editor = Editor::new(self.store.as_ref());
        (self.write)(&mut editor, &self.key, value);
        editor.finish(self.durability)
    }
}

impl<T> Clone for Preference<T> {
    fn clone(&self) -> Self {
        Preference {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            durability: self.durability,
            kind: self.kind,
            read: Arc::clone(&self.read),
            write: Arc::clone(&self.write),
        }
    }
}

impl<T> fmt::Debug for Preference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preference")
            .field("key", &self.key)
            .field("durability", &self.durability)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TomlStore;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    struct LevelFlag;

    impl Transcoder for LevelFlag {
        type Value = Level;
        type Stored = bool;

        fn to_stored(&self, value: &Level) -> bool {
            *value == Level::High
        }

        fn from_stored(&self, stored: bool) -> Level {
            if stored {
                Level::High
            } else {
                Level::Low
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Label(String);

    /// Upper-cases on the way in and brackets on the way out, so a value
    /// that went through storage is distinguishable from one that did not.
    struct Shouting;

    impl Transcoder for Shouting {
        type Value = Label;
        type Stored = String;

        fn to_stored(&self, value: &Label) -> String {
            value.0.to_uppercase()
        }

        fn from_stored(&self, stored: String) -> Label {
            Label(format!("<{stored}>"))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Slot(i32);

    struct OffsetSlot;

    impl Transcoder for OffsetSlot {
        type Value = Slot;
        type Stored = i32;

        fn to_stored(&self, value: &Slot) -> i32 {
            value.0 + 100
        }

        fn from_stored(&self, stored: i32) -> Slot {
            Slot(stored - 1)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Percent(u8);

    struct Fraction;

    impl Transcoder for Fraction {
        type Value = Percent;
        type Stored = f32;

        fn to_stored(&self, value: &Percent) -> f32 {
            f32::from(value.0) / 100.0
        }

        fn from_stored(&self, stored: f32) -> Percent {
            Percent((stored * 100.0).round() as u8)
        }
    }

    struct SortedRoles;

    impl Transcoder for SortedRoles {
        type Value = Vec<String>;
        type Stored = StringSet;

        fn to_stored(&self, value: &Vec<String>) -> StringSet {
            value.iter().cloned().collect()
        }

        fn from_stored(&self, stored: StringSet) -> Vec<String> {
            stored.into_iter().collect()
        }
    }

    fn store() -> Arc<dyn SharedStore> {
        Arc::new(TomlStore::in_memory("preference-tests"))
    }

    #[test]
    fn test_binding_name_is_the_key_unless_overridden() {
        let store = store();
        let inferred = PreferenceSpec::int(0).bind(Arc::clone(&store), "volume");
        let explicit = PreferenceSpec::int(0)
            .key("audio.volume")
            .bind(Arc::clone(&store), "volume");
        assert_eq!(inferred.key(), "volume");
        assert_eq!(explicit.key(), "audio.volume");

        inferred.set(3).unwrap();
        assert_eq!(explicit.get().unwrap(), 0);
    }

    #[test]
    fn test_default_durability_is_buffered() {
        let pref = PreferenceSpec::boolean(false).bind(store(), "flag");
        assert_eq!(pref.durability(), Durability::Buffered);
        let pref = PreferenceSpec::boolean(false).immediate().bind(store(), "flag");
        assert_eq!(pref.durability(), Durability::Immediate);
    }

    #[test]
    fn test_mapped_primitive_decodes_default_and_writes_encoded() {
        let store = store();
        let level = PreferenceSpec::mapped_boolean(Level::High, LevelFlag)
            .immediate()
            .bind(Arc::clone(&store), "level");
        assert_eq!(level.kind(), PrimitiveKind::Boolean);
        assert_eq!(level.get().unwrap(), Level::High);

        level.set(Level::Low).unwrap();
        assert_eq!(level.get().unwrap(), Level::Low);
        assert!(!store.get_boolean("level", true).unwrap());
    }

    #[test]
    fn test_mapped_string_default_is_returned_unencoded() {
        let store = store();
        let label = PreferenceSpec::mapped_string_or(Label("plain".to_string()), Shouting)
            .immediate()
            .bind(Arc::clone(&store), "label");
        assert_eq!(label.kind(), PrimitiveKind::String);

        // Absent: the default itself, not decode(encode(default)).
        assert_eq!(label.get().unwrap(), Label("plain".to_string()));
        assert!(!store.contains("label"));

        label.set(Label("hi".to_string())).unwrap();
        assert_eq!(
            store.get_string("label", None).unwrap(),
            Some("HI".to_string())
        );
        assert_eq!(label.get().unwrap(), Label("<HI>".to_string()));
    }

    #[test]
    fn test_mapped_int_default_goes_through_the_transcoder() {
        let store = store();
        let slot = PreferenceSpec::mapped_int(Slot(5), OffsetSlot)
            .immediate()
            .bind(Arc::clone(&store), "slot");

        // Absent: the default is encoded (105), read back, then decoded (104).
        assert_eq!(slot.get().unwrap(), Slot(104));
        assert!(!store.contains("slot"));

        slot.set(Slot(1)).unwrap();
        assert_eq!(store.get_int("slot", 0).unwrap(), 101);
        assert_eq!(slot.get().unwrap(), Slot(100));
    }

    #[test]
    fn test_mapped_float_stores_the_encoded_fraction() {
        let store = store();
        let volume = PreferenceSpec::mapped_float(Percent(50), Fraction)
            .immediate()
            .bind(Arc::clone(&store), "volume");
        assert_eq!(volume.kind(), PrimitiveKind::Float);
        assert_eq!(volume.get().unwrap(), Percent(50));

        volume.set(Percent(25)).unwrap();
        assert_eq!(store.get_float("volume", 0.0).unwrap(), 0.25);
        assert_eq!(volume.get().unwrap(), Percent(25));
    }

    #[test]
    fn test_nullable_mapped_string_set_clears_on_none() {
        let store = store();
        let roles = PreferenceSpec::mapped_string_set(SortedRoles)
            .immediate()
            .bind(Arc::clone(&store), "roles");
        assert_eq!(roles.kind(), PrimitiveKind::StringSet);
        assert_eq!(roles.get().unwrap(), None);
        assert!(!store.contains("roles"));

        roles
            .set(Some(vec!["writer".to_string(), "admin".to_string()]))
            .unwrap();
        assert_eq!(
            roles.get().unwrap(),
            Some(vec!["admin".to_string(), "writer".to_string()])
        );
        assert!(store.contains("roles"));

        roles.set(None).unwrap();
        assert_eq!(roles.get().unwrap(), None);
        assert!(!store.contains("roles"));
    }

    #[test]
    fn test_clone_shares_the_slot() {
        let pref = PreferenceSpec::long(0).bind(store(), "counter");
        let copy = pref.clone();
        pref.set(99).unwrap();
        assert_eq!(copy.get().unwrap(), 99);
    }
}
