//! Properties of the cache files: whatever is saved loads back unchanged, and saving the same
//! result again leaves the file alone.

use std::fmt::Debug;
use std::path::Path;

use proptest::prelude::*;

use memostash::{load_typed, persist_result, CacheConfig, Persist, SaveFormat, SaveStatus};

fn formats() -> impl Strategy<Value = SaveFormat> {
    prop_oneof![
        Just(SaveFormat::Binary),
        Just(SaveFormat::Csv),
        Just(SaveFormat::Spreadsheet),
    ]
}

fn finite_floats() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO
}

// Text that looks like other types is the interesting case for the text formats.
fn texts() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,20}",
        "-?[0-9]{1,4}\\.[0-9]{0,4}",
        "[0-9]e[0-9]",
        "(true|True|TRUE|false|False)",
        "[A-Za-z0-9 ._,;\"'-]{0,24}",
        Just(String::new()),
    ]
}

fn save_twice<V>(dir: &Path, format: SaveFormat, value: &V) -> Result<(), TestCaseError>
where
    V: Persist + PartialEq + Debug,
{
    let config = CacheConfig::new(format).in_dir(dir);
    prop_assert_eq!(persist_result("prop", &config, value).unwrap(), SaveStatus::Created);

    let loaded: V = load_typed(&config.cache_path("prop"), format).unwrap();
    prop_assert_eq!(&loaded, value, "{}", format);
    prop_assert_eq!(
        persist_result("prop", &config, value).unwrap(),
        SaveStatus::Unchanged,
        "{}",
        format
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_u64_round_trip(value in any::<u64>(), format in formats()) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &value)?;
    }

    #[test]
    fn prop_i64_round_trip(value in any::<i64>(), format in formats()) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &value)?;
    }

    #[test]
    fn prop_f64_round_trip(value in finite_floats(), format in formats()) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &value)?;
    }

    #[test]
    fn prop_string_round_trip(value in texts(), format in formats()) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &value)?;
    }

    #[test]
    fn prop_u64_sequence_round_trip(
        values in prop::collection::vec(any::<u64>(), 0..8),
        format in formats()
    ) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &values)?;
    }

    #[test]
    fn prop_i64_sequence_round_trip(
        values in prop::collection::vec(any::<i64>(), 0..8),
        format in formats()
    ) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &values)?;
    }

    #[test]
    fn prop_f64_sequence_round_trip(
        values in prop::collection::vec(finite_floats(), 0..8),
        format in formats()
    ) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &values)?;
    }

    #[test]
    fn prop_string_sequence_round_trip(
        values in prop::collection::vec(texts(), 0..8),
        format in formats()
    ) {
        let dir = tempfile::tempdir().unwrap();
        save_twice(dir.path(), format, &values)?;
    }
}
