/// Two-way conversion between an application type and a native store kind.
///
/// Used by the `mapped_*` preference constructors. Implementations must be
/// pure: the same input always gives the same output and no state is kept.
/// Values the application never stores do not need to convert cleanly.
///
/// ```rust
/// use typed_prefs::Transcoder;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Theme {
///     Light,
///     Dark,
/// }
///
/// struct ThemeTranscoder;
///
/// impl Transcoder for ThemeTranscoder {
///     type Value = Theme;
///     type Stored = i32;
///
///     fn to_stored(&self, value: &Theme) -> i32 {
///         match value {
///             Theme::Light => 0,
///             Theme::Dark => 1,
///         }
///     }
///
///     fn from_stored(&self, stored: i32) -> Theme {
///         if stored == 1 { Theme::Dark } else { Theme::Light }
///     }
/// }
///
/// assert_eq!(ThemeTranscoder.from_stored(ThemeTranscoder.to_stored(&Theme::Dark)), Theme::Dark);
/// ```
pub trait Transcoder: Send + Sync + 'static {
    type Value;
    type Stored;

    fn to_stored(&self, value: &Self::Value) -> Self::Stored;

    fn from_stored(&self, stored: Self::Stored) -> Self::Value;
}
