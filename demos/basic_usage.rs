use typed_prefs::{shared_prefs, PreferenceSpec, StringSet, TomlStore, Transcoder};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Theme {
    System,
    Light,
    Dark,
}

struct ThemeTranscoder;

impl Transcoder for ThemeTranscoder {
    type Value = Theme;
    type Stored = i32;

    fn to_stored(&self, value: &Theme) -> i32 {
        match value {
            Theme::System => 0,
            Theme::Light => 1,
            Theme::Dark => 2,
        }
    }

    fn from_stored(&self, stored: i32) -> Theme {
        match stored {
            1 => Theme::Light,
            2 => Theme::Dark,
            _ => Theme::System,
        }
    }
}

shared_prefs! {
    pub struct AppPreferences {
        pub notifications_enabled: bool = PreferenceSpec::boolean(true) => "notifications",
        pub username: String = PreferenceSpec::string_or("guest"),
        pub theme: Theme = PreferenceSpec::mapped_int(Theme::System, ThemeTranscoder),
        pub font_size: i32 = PreferenceSpec::int(14),
        pub favorites: Option<StringSet> = PreferenceSpec::string_set(),
        pub last_launch: i64 = PreferenceSpec::long(0).immediate(),
    }
}

fn main() -> Result<(), typed_prefs::StoreError> {
    let store = TomlStore::open("com.example.myapp", "app-preferences")?;
    let prefs = AppPreferences::new(store.clone());

    println!("Current preferences:");
    println!("  Notifications: {}", prefs.notifications_enabled()?);
    println!("  Username: {}", prefs.username()?);
    println!("  Theme: {:?}", prefs.theme()?);
    println!("  Font size: {}", prefs.font_size()?);
    println!("  Favorites: {:?}", prefs.favorites()?);

    prefs.set_username("Alice".to_string())?;
    prefs.set_theme(Theme::Dark)?;
    prefs.set_font_size(16)?;
    prefs.set_favorites(Some(StringSet::from(["rust".to_string()])))?;
    prefs.set_last_launch(1_700_000_000)?;

    println!("\nUpdated preferences:");
    println!("  Username: {}", prefs.username()?);
    println!("  Theme: {:?}", prefs.theme()?);
    println!("  Font size: {}", prefs.font_size()?);

    store.sync()?;
    if let Some(location) = store.location() {
        println!("\nPreferences stored at: {}", location);
    }
    Ok(())
}
