//! # typed_prefs
//!
//! Typed, property-style accessors over a key-value preferences store.
//!
//! Instead of scattering `get_int("launch_count", 0)` / `put_int(...)` pairs and
//! string keys across an application, each preference is declared once with its
//! kind, default, key and durability, then read and written like a field.
//!
//! - **Six native kinds:** `bool`, `i32`, `i64`, `f32`, strings and string sets.
//! - **Mapped preferences:** a [`Transcoder`] stores a domain type (an enum, a
//!   duration, ...) as one of the native kinds.
//! - **Durability per preference:** [`Durability::Buffered`] writes return at
//!   once and are flushed in the background; [`Durability::Immediate`] writes
//!   are flushed before `set` returns and report the outcome.
//! - **Bring your own store:** anything implementing [`SharedStore`] works. The
//!   bundled [`TomlStore`] keeps one TOML document per store, written through a
//!   temporary file so a crash never leaves it half-written.
//!
//! Persistence, locking and ordering guarantees are those of the store; this
//! crate adds no caching, retries or change notifications on top.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use typed_prefs::{shared_prefs, PreferenceSpec, TomlStore, Transcoder};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! pub enum Theme {
//!     Light,
//!     Dark,
//! }
//!
//! pub struct ThemeTranscoder;
//!
//! impl Transcoder for ThemeTranscoder {
//!     type Value = Theme;
//!     type Stored = i32;
//!
//!     fn to_stored(&self, value: &Theme) -> i32 {
//!         *value as i32
//!     }
//!
//!     fn from_stored(&self, stored: i32) -> Theme {
//!         if stored == 1 { Theme::Dark } else { Theme::Light }
//!     }
//! }
//!
//! shared_prefs! {
//!     /// Application preferences.
//!     pub struct AppPreferences {
//!         /// Whether notifications are enabled.
//!         pub notifications: bool = PreferenceSpec::boolean(true),
//!         /// Interface language.
//!         pub language: String = PreferenceSpec::string_or("en") => "ui.language",
//!         pub theme: Theme =
//!             PreferenceSpec::mapped_int(Theme::Light, ThemeTranscoder).immediate(),
//!     }
//! }
//!
//! let prefs = AppPreferences::new(Arc::new(TomlStore::in_memory("app-preferences")));
//! assert!(prefs.notifications().unwrap());
//! prefs.set_theme(Theme::Dark).unwrap();
//! assert_eq!(prefs.theme().unwrap(), Theme::Dark);
//! assert_eq!(prefs.language_preference().key(), "ui.language");
//! ```

// Re-exported for the macro so users don't need it in their Cargo.toml
pub use paste;

mod backend;
mod error;
mod kind;
mod preference;
mod prefs;
mod store;
mod toml_store;
mod transcoder;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use backend::wasm::LocalStorageBackend;
pub use backend::Backend;
#[cfg(not(target_arch = "wasm32"))]
pub use backend::native::FileBackend;
pub use error::StoreError;
pub use kind::{Primitive, PrimitiveKind, StoredValue, StringSet};
pub use preference::{Preference, PreferenceSpec};
pub use prefs::SharedPrefs;
pub use store::{Change, Durability, Editor, SharedStore};
pub use toml_store::TomlStore;
pub use transcoder::Transcoder;

/// Declares a struct whose fields are preferences bound to one store.
///
/// Each field is written `name: Type = spec`, where `spec` is a
/// [`PreferenceSpec`] expression. The field name is the store key unless the
/// spec sets one, or the field ends with `=> "key"`.
///
/// For every field `x` the struct gets `x()`, `set_x(value)` and
/// `x_preference()`; `new(store)` binds them all.
///
/// `new` and `shared_prefs` are generated on every struct, so they cannot be
/// used as field names.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use typed_prefs::{shared_prefs, PreferenceSpec, TomlStore};
///
/// shared_prefs! {
///     pub struct EditorPrefs {
///         /// Font size in points.
///         pub font_size: i32 = PreferenceSpec::int(14),
///         pub last_file: Option<String> = PreferenceSpec::string() => "recent.file",
///     }
/// }
///
/// let prefs = EditorPrefs::new(Arc::new(TomlStore::in_memory("editor")));
/// assert_eq!(prefs.font_size().unwrap(), 14);
/// assert_eq!(prefs.last_file().unwrap(), None);
/// prefs.set_last_file(Some("notes.txt".to_string())).unwrap();
/// assert_eq!(prefs.last_file_preference().key(), "recent.file");
/// ```
#[macro_export]
macro_rules! shared_prefs {
    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$inner:meta])*
                $field_vis:vis $field:ident: $type:ty = $spec:expr $(=> $key:expr)?,
            )*
        }
    ) => {
        $crate::paste::paste! {
            $(#[$outer])*
            #[derive(Debug, Clone)]
            $vis struct $name {
                shared: $crate::SharedPrefs,
                $(
                    [<_ $field>]: $crate::Preference<$type>,
                )*
            }

            impl $name {
                /// Binds every preference to `store`.
                pub fn new(store: ::std::sync::Arc<dyn $crate::SharedStore>) -> Self {
                    let shared = $crate::SharedPrefs::new(store);
                    $name {
                        $(
                            [<_ $field>]: shared.bind::<$type>(
                                ($spec) $(.key($key))?,
                                stringify!($field),
                            ),
                        )*
                        shared,
                    }
                }

                pub fn shared_prefs(&self) -> &$crate::SharedPrefs {
                    &self.shared
                }

                $(
                    $(#[$inner])*
                    $field_vis fn $field(
                        &self,
                    ) -> ::std::result::Result<$type, $crate::StoreError> {
                        self.[<_ $field>].get()
                    }

                    /// Stores a new value with the preference's durability.
                    $field_vis fn [<set_ $field>](
                        &self,
                        value: $type,
                    ) -> ::std::result::Result<(), $crate::StoreError> {
                        self.[<_ $field>].set(value)
                    }

                    /// Returns the bound accessor.
                    $field_vis fn [<$field _preference>](&self) -> &$crate::Preference<$type> {
                        &self.[<_ $field>]
                    }
                )*
            }
        }
    };
}
