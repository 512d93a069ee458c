//! The macro must expand in a downstream crate that imports nothing but the
//! macro itself and `PreferenceSpec`.

use typed_prefs::shared_prefs;

shared_prefs! {
    pub struct MacroHygieneTest {
        pub test_field: bool = typed_prefs::PreferenceSpec::boolean(false),
        explicit: i32 = typed_prefs::PreferenceSpec::int(1) => "explicit_key",
    }
}

#[test]
fn test_macro_hygiene() {
    let store = std::sync::Arc::new(typed_prefs::TomlStore::in_memory("macro-hygiene-test"));
    let prefs = MacroHygieneTest::new(store);

    prefs.set_test_field(true).unwrap();
    assert!(prefs.test_field().unwrap());

    assert_eq!(prefs.explicit().unwrap(), 1);
    assert_eq!(prefs.explicit_preference().key(), "explicit_key");
    assert_eq!(prefs.test_field_preference().key(), "test_field");
}
