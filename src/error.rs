use crate::kind::PrimitiveKind;
use thiserror::Error;

/// Errors reported by a preferences store.
///
/// Accessors never add error kinds of their own; whatever the store reports is
/// handed back to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key exists but holds a different primitive kind than the one requested.
    #[error("key '{key}' holds a {found} value, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: PrimitiveKind,
        found: PrimitiveKind,
    },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("failed to decode preferences document '{location}': {source}")]
    Decode {
        location: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode preferences document: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("no configuration directory available for namespace '{0}'")]
    NoConfigDir(String),
}
