//! Behaviour every store must share, checked across all three formats

use std::fs;
use std::path::Path;

use confstore::{ConfigStore, IniStore, JsonStore, StoreError, XmlStore};
use proptest::prelude::*;
use tempfile::TempDir;

type Entry = (String, String, String);

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// Values an INI line can carry unchanged: no `;`, no padding, one line
fn ini_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/:-]{0,12}"
}

fn text_value() -> impl Strategy<Value = String> {
    "[ -~]{0,16}"
}

/// Printable text plus line breaks, including INI markers
fn raw_text() -> impl Strategy<Value = String> {
    "[ -~\n]{0,16}"
}

fn entry_list(value: impl Strategy<Value = String>) -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((name(), name(), value), 0..12)
}

fn snapshot<S: ConfigStore>(store: &S) -> Vec<(String, Vec<(String, String)>)> {
    store
        .sections()
        .into_iter()
        .map(|section| {
            let values = store.all_key_values(&section).unwrap();
            (section, values)
        })
        .collect()
}

fn roundtrip<S: ConfigStore>(path: &Path, entries: &[Entry]) {
    let mut store = S::open(path).unwrap();
    for (section, key, value) in entries {
        store.set_string(section, key, value).unwrap();
    }
    let before = snapshot(&store);
    store.save().unwrap();

    let reopened = S::open(path).unwrap();
    assert_eq!(snapshot(&reopened), before);
}

fn set_then_get<S: ConfigStore>(path: &Path, entries: &[Entry]) {
    let mut store = S::open(path).unwrap();
    for (section, key, value) in entries {
        store.set_string(section, key, value).unwrap();
        assert_eq!(&store.get_string(section, key, "<unused>"), value);
        assert!(store.key_exists(section, key));
        assert!(store.section_exists(section));
    }
}

fn create_twice<S: ConfigStore>(path: &Path, section: &str) {
    let mut store = S::open(path).unwrap();
    if store.section_exists(section) {
        return;
    }

    store.create_section(section).unwrap();
    assert!(store.section_exists(section));
    assert!(matches!(
        store.create_section(section),
        Err(StoreError::DuplicateSection(ref s)) if s == section
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ini_set_then_get(entries in entry_list(ini_value())) {
        let dir = TempDir::new().unwrap();
        set_then_get::<IniStore>(&dir.path().join("p.ini"), &entries);
    }

    #[test]
    fn json_set_then_get(entries in entry_list(text_value())) {
        let dir = TempDir::new().unwrap();
        set_then_get::<JsonStore>(&dir.path().join("p.json"), &entries);
    }

    #[test]
    fn xml_set_then_get(entries in entry_list(text_value())) {
        let dir = TempDir::new().unwrap();
        set_then_get::<XmlStore>(&dir.path().join("p.xml"), &entries);
    }

    #[test]
    fn ini_roundtrip(entries in entry_list(ini_value())) {
        let dir = TempDir::new().unwrap();
        roundtrip::<IniStore>(&dir.path().join("p.ini"), &entries);
    }

    #[test]
    fn json_roundtrip(entries in entry_list(text_value())) {
        let dir = TempDir::new().unwrap();
        roundtrip::<JsonStore>(&dir.path().join("p.json"), &entries);
    }

    #[test]
    fn xml_roundtrip(entries in entry_list(text_value())) {
        let dir = TempDir::new().unwrap();
        roundtrip::<XmlStore>(&dir.path().join("p.xml"), &entries);
    }

    #[test]
    fn ini_accepted_values_survive_save(
        entries in prop::collection::vec((name(), raw_text(), raw_text()), 0..12)
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.ini");

        let mut store = IniStore::open(&path).unwrap();
        for (section, key, value) in &entries {
            let before = snapshot(&store);
            match store.set_string(section, key, value) {
                Ok(()) => prop_assert_eq!(&store.get_string(section, key, "<unused>"), value),
                Err(err) => {
                    let is_unrepresentable = matches!(err, StoreError::Unrepresentable { .. });
                    prop_assert!(is_unrepresentable);
                    prop_assert_eq!(snapshot(&store), before);
                }
            }
        }
        let before = snapshot(&store);
        store.save().unwrap();

        let reopened = IniStore::open(&path).unwrap();
        prop_assert_eq!(snapshot(&reopened), before);
    }

    #[test]
    fn create_section_is_exclusive(section in name()) {
        let dir = TempDir::new().unwrap();
        create_twice::<IniStore>(&dir.path().join("p.ini"), &section);
        create_twice::<JsonStore>(&dir.path().join("p.json"), &section);
        create_twice::<XmlStore>(&dir.path().join("p.xml"), &section);
    }

    #[test]
    fn jagged_arrays_keep_row_lengths(
        rows in prop::collection::vec(prop::collection::vec(any::<i32>(), 0..5), 0..6)
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.set_jagged("arrays", "rows", &rows).unwrap();
        store.save().unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        prop_assert_eq!(reopened.get_jagged::<i32>("arrays", "rows", vec![]), rows);
    }
}

fn delete_errors<S: ConfigStore>(path: &Path) {
    let mut store = S::open(path).unwrap();
    store.create_section("s").unwrap();

    assert!(matches!(
        store.delete_key("s", "missing"),
        Err(StoreError::NotFound { ref key, .. }) if key.as_deref() == Some("missing")
    ));
    assert!(matches!(
        store.delete_key("absent", "missing"),
        Err(StoreError::NotFound { key: None, .. })
    ));
    assert!(store.delete_section("absent").unwrap_err().is_not_found());
}

#[test]
fn deleting_missing_things_is_not_found() {
    let dir = TempDir::new().unwrap();
    delete_errors::<IniStore>(&dir.path().join("d.ini"));
    delete_errors::<JsonStore>(&dir.path().join("d.json"));
    delete_errors::<XmlStore>(&dir.path().join("d.xml"));
}

fn fresh_store<S: ConfigStore>(path: &Path) -> String {
    let store = S::open(path).unwrap();
    assert!(store.sections().is_empty());
    assert!(path.exists());
    fs::read_to_string(path).unwrap()
}

#[test]
fn fresh_files_hold_minimal_documents() {
    let dir = TempDir::new().unwrap();

    assert_eq!(fresh_store::<IniStore>(&dir.path().join("f.ini")), "");

    let json = fresh_store::<JsonStore>(&dir.path().join("f.json"));
    assert_eq!(json.trim(), "{}");

    let xml = fresh_store::<XmlStore>(&dir.path().join("f.xml"));
    assert!(xml.contains("<configuration/>"));
}

#[test]
fn unsaved_changes_stay_in_memory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.json");

    let mut store = JsonStore::open(&path).unwrap();
    store.set_string("s", "k", "v").unwrap();
    drop(store);

    let reopened = JsonStore::open(&path).unwrap();
    assert!(!reopened.section_exists("s"));
}

#[test]
fn bad_int_error_policy_differs_by_format() {
    let dir = TempDir::new().unwrap();
    let ini_path = dir.path().join("p.ini");
    let json_path = dir.path().join("p.json");

    let mut ini = IniStore::open(&ini_path).unwrap();
    ini.set_string("s", "k", "abc").unwrap();
    assert!(matches!(
        ini.get_int("s", "k", 0),
        Err(StoreError::Format { .. })
    ));

    let mut json = JsonStore::open(&json_path).unwrap();
    json.set_string("s", "k", "abc").unwrap();
    assert_eq!(json.get_int("s", "k", 0), 0);
}

#[test]
fn json_arrays_roundtrip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.json");

    let mut store = JsonStore::open(&path).unwrap();
    store.set_array("s", "flat", &[1, 2, 3]).unwrap();
    store.set_jagged("s", "jagged", &[vec![1, 2], vec![3]]).unwrap();
    store.save().unwrap();

    let reopened = JsonStore::open(&path).unwrap();
    assert_eq!(reopened.get_array::<i32>("s", "flat", vec![]), vec![1, 2, 3]);

    let jagged = reopened.get_jagged::<i32>("s", "jagged", vec![]);
    assert_eq!(jagged, vec![vec![1, 2], vec![3]]);
    assert_eq!(jagged.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);
}
