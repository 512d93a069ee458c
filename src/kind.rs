//! The closed set of value kinds a store can hold natively, and the one
//! read/write pair each kind maps to.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{Editor, SharedStore};

/// Native representation of the string-set kind.
pub type StringSet = BTreeSet<String>;

/// One of the six value types a store persists directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Int,
    Long,
    Float,
    String,
    StringSet,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::String,
        PrimitiveKind::StringSet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::StringSet => "string_set",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value as the store holds it, tagged with its kind.
///
/// The serialized form is a table with `kind` and `value`, so an `int` and a
/// `long` holding the same number stay distinguishable on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    StringSet(StringSet),
}

impl StoredValue {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            StoredValue::Boolean(_) => PrimitiveKind::Boolean,
            StoredValue::Int(_) => PrimitiveKind::Int,
            StoredValue::Long(_) => PrimitiveKind::Long,
            StoredValue::Float(_) => PrimitiveKind::Float,
            StoredValue::String(_) => PrimitiveKind::String,
            StoredValue::StringSet(_) => PrimitiveKind::StringSet,
        }
    }
}

/// A Rust type backed by exactly one native store call pair.
///
/// Implemented for `bool`, `i32`, `i64`, `f32`, `Option<String>` and
/// `Option<StringSet>`. No conversion happens here; anything beyond the direct
/// store call belongs in a [`Transcoder`](crate::Transcoder).
pub trait Primitive: Sized + Clone + Send + Sync + 'static {
    const KIND: PrimitiveKind;

    /// Reads `key`, returning `default` when the key is absent.
    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError>;

    /// Queues a write of `value` under `key`.
    fn write(editor: &mut Editor<'_>, key: &str, value: Self);
}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Boolean;

    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError> {
        store.get_boolean(key, default)
    }

    fn write(editor: &mut Editor<'_>, key: &str, value: Self) {
        editor.put_boolean(key, value);
    }
}

impl Primitive for i32 {
    const KIND: PrimitiveKind = PrimitiveKind::Int;

    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError> {
        store.get_int(key, default)
    }

    fn write(editor: &mut Editor<'_>, key: &str, value: Self) {
        editor.put_int(key, value);
    }
}

impl Primitive for i64 {
    const KIND: PrimitiveKind = PrimitiveKind::Long;

    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError> {
        store.get_long(key, default)
    }

    fn write(editor: &mut Editor<'_>, key: &str, value: Self) {
        editor.put_long(key, value);
    }
}

impl Primitive for f32 {
    const KIND: PrimitiveKind = PrimitiveKind::Float;

    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError> {
        store.get_float(key, default)
    }

    fn write(editor: &mut Editor<'_>, key: &str, value: Self) {
        editor.put_float(key, value);
    }
}

impl Primitive for Option<String> {
    const KIND: PrimitiveKind = PrimitiveKind::String;

    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError> {
        store.get_string(key, default)
    }

    fn write(editor: &mut Editor<'_>, key: &str, value: Self) {
        editor.put_string(key, value);
    }
}

impl Primitive for Option<StringSet> {
    const KIND: PrimitiveKind = PrimitiveKind::StringSet;

    fn read(store: &dyn SharedStore, key: &str, default: Self) -> Result<Self, StoreError> {
        store.get_string_set(key, default)
    }

    fn write(editor: &mut Editor<'_>, key: &str, value: Self) {
        editor.put_string_set(key, value);
    }
}
