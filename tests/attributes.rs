use std::fs;

use memostash::{load_typed, memoize, save_result, CacheConfig, SaveFormat};

#[save_result(Format: Csv, Dir: concat!(env!("CARGO_TARGET_TMPDIR"), "/attributes"))]
fn fibonacci_saved(n: u64) -> u64 {
    memostash::fib::fibonacci_unbounded(n)
}

#[save_result(Format: Binary, Dir: concat!(env!("CARGO_TARGET_TMPDIR"), "/attributes"), Policy: Always)]
fn always_written() -> Vec<i64> {
    vec![3, 1, 2]
}

fn spreadsheet_config() -> CacheConfig {
    CacheConfig::new(SaveFormat::Spreadsheet)
        .in_dir(concat!(env!("CARGO_TARGET_TMPDIR"), "/attributes"))
}

#[save_result(Config: spreadsheet_config())]
fn configured(label: String) -> String {
    label.to_uppercase()
}

#[test]
fn save_result_writes_and_returns_fresh_value() {
    let path = persisted_path_fibonacci_saved();
    fs::remove_file(&path).ok();
    assert!(path.ends_with("fibonacci_saved_result.csv"));

    assert_eq!(fibonacci_saved(18).unwrap(), 2584);
    assert_eq!(load_typed::<u64>(&path, SaveFormat::Csv).unwrap(), 2584);

    assert_eq!(fibonacci_saved(19).unwrap(), 4181);
    assert_eq!(load_typed::<u64>(&path, SaveFormat::Csv).unwrap(), 4181);

    assert_eq!(persisted_original_fibonacci_saved(10), 55);
}

#[test]
fn policy_option_is_applied() {
    let path = persisted_path_always_written();
    fs::remove_file(&path).ok();

    assert_eq!(always_written().unwrap(), vec![3, 1, 2]);
    assert_eq!(
        load_typed::<Vec<i64>>(&path, SaveFormat::Binary).unwrap(),
        vec![3, 1, 2]
    );
}

#[test]
fn config_option_is_evaluated() {
    let path = persisted_path_configured();
    assert_eq!(path, spreadsheet_config().cache_path("configured"));
    fs::remove_file(&path).ok();

    assert_eq!(configured("fib".to_string()).unwrap(), "FIB");
    assert_eq!(load_typed::<String>(&path, SaveFormat::Spreadsheet).unwrap(), "FIB");
}

#[memoize(SharedCache)]
fn shared_length(arg: String, modulus: usize) -> bool {
    arg.len() % modulus == 0
}

#[memoize]
fn no_arguments() -> u32 {
    7
}

#[test]
fn shared_cache_counts_and_flushes() {
    memoized_flush_shared_length();
    assert!(!shared_length("World".to_string(), 2));
    assert!(!shared_length("World".to_string(), 2));
    assert!(!memoized_original_shared_length("World".to_string(), 2));
    assert_eq!(memoized_size_shared_length(), 1);
    memoized_flush_shared_length();
    assert_eq!(memoized_size_shared_length(), 0);
}

#[test]
fn function_without_arguments_is_memoized() {
    assert_eq!(no_arguments(), 7);
    assert_eq!(no_arguments(), 7);
    assert_eq!(memoized_size_no_arguments(), 1);
}

#[cfg(feature = "full")]
mod bounded {
    use memostash::memoize;

    #[memoize(Capacity: 2)]
    fn square(n: u32) -> u32 {
        n * n
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        assert_eq!(square(2), 4);
        assert_eq!(square(3), 9);
        assert_eq!(square(4), 16);
        assert_eq!(memoized_size_square(), 2);
    }
}
