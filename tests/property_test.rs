use std::sync::Arc;

use proptest::prelude::*;
use typed_prefs::{PreferenceSpec, SharedPrefs, StringSet, TomlStore, Transcoder};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

const PRIORITIES: [Priority; 4] = [
    Priority::Low,
    Priority::Normal,
    Priority::High,
    Priority::Urgent,
];

struct PriorityTranscoder;

impl Transcoder for PriorityTranscoder {
    type Value = Priority;
    type Stored = i64;

    fn to_stored(&self, value: &Priority) -> i64 {
        PRIORITIES.iter().position(|p| p == value).unwrap_or(0) as i64
    }

    fn from_stored(&self, stored: i64) -> Priority {
        usize::try_from(stored)
            .ok()
            .and_then(|i| PRIORITIES.get(i).copied())
            .unwrap_or(Priority::Low)
    }
}

fn prefs() -> SharedPrefs {
    SharedPrefs::new(Arc::new(TomlStore::in_memory("property")))
}

proptest! {
    #[test]
    fn prop_int_read_after_write(value in any::<i32>(), default in any::<i32>()) {
        let pref = prefs().bind(PreferenceSpec::int(default).immediate(), "n");
        prop_assert_eq!(pref.get().unwrap(), default);
        pref.set(value).unwrap();
        prop_assert_eq!(pref.get().unwrap(), value);
    }

    #[test]
    fn prop_long_read_after_write(value in any::<i64>()) {
        let pref = prefs().bind(PreferenceSpec::long(0).immediate(), "n");
        pref.set(value).unwrap();
        prop_assert_eq!(pref.get().unwrap(), value);
    }

    #[test]
    fn prop_float_read_after_write(value in -1.0e6f32..1.0e6f32) {
        let pref = prefs().bind(PreferenceSpec::float(0.0).immediate(), "f");
        pref.set(value).unwrap();
        prop_assert_eq!(pref.get().unwrap(), value);
    }

    #[test]
    fn prop_string_read_after_write(value in ".*", default in "[a-z]{0,4}") {
        let pref = prefs().bind(PreferenceSpec::string_or(default.clone()).immediate(), "s");
        prop_assert_eq!(pref.get().unwrap(), default);
        pref.set(value.clone()).unwrap();
        prop_assert_eq!(pref.get().unwrap(), value);
    }

    #[test]
    fn prop_string_set_read_after_write(
        value in proptest::collection::btree_set("[a-z]{0,8}", 0..6)
    ) {
        let pref = prefs().bind(PreferenceSpec::string_set().immediate(), "ss");
        prop_assert_eq!(pref.get().unwrap(), None);
        pref.set(Some(value.clone())).unwrap();
        prop_assert_eq!(pref.get().unwrap(), Some::<StringSet>(value));
    }

    #[test]
    fn prop_priority_transcoder_round_trips(index in 0usize..4) {
        let priority = PRIORITIES[index];
        let t = PriorityTranscoder;
        prop_assert_eq!(t.from_stored(t.to_stored(&priority)), priority);

        let pref = prefs().bind(
            PreferenceSpec::mapped_long(Priority::Normal, PriorityTranscoder).immediate(),
            "priority",
        );
        prop_assert_eq!(pref.get().unwrap(), Priority::Normal);
        pref.set(priority).unwrap();
        prop_assert_eq!(pref.get().unwrap(), priority);
    }
}
