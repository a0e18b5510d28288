//! Runtime half of `#[save_result]`: persist a function's result and report what happened.

use std::fmt;
use std::path::Path;

use crate::config::{CacheConfig, OverwritePolicy};
use crate::disk::{load_typed, save_result_to_disk};
use crate::error::Result;
use crate::value::Persist;

/// Outcome of persisting one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// No file existed; it was written.
    Created,
    /// The stored value equals the new one; the file was left untouched.
    Unchanged,
    /// The file held something else (or the policy is `Always`); it was rewritten.
    Overwritten,
}

impl SaveStatus {
    pub fn wrote_file(self) -> bool {
        self != SaveStatus::Unchanged
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::Unchanged => f.write_str("already exists"),
            SaveStatus::Created | SaveStatus::Overwritten => f.write_str("saved"),
        }
    }
}

/// Store `result` as the latest result of `fn_name`.
pub fn persist_result<V>(fn_name: &str, config: &CacheConfig, result: &V) -> Result<SaveStatus>
where
    V: Persist + PartialEq + fmt::Debug,
{
    let path = config.cache_path(fn_name);

    let status = if !path.exists() {
        SaveStatus::Created
    } else if config.policy == OverwritePolicy::Always {
        SaveStatus::Overwritten
    } else if matches_stored(&path, config, result)? {
        SaveStatus::Unchanged
    } else {
        SaveStatus::Overwritten
    };

    if status == SaveStatus::Unchanged {
        tracing::info!(
            "Result already exists in '{}'. Loaded result: {:?}",
            path.display(),
            result
        );
    } else {
        save_result_to_disk(&path, result, config.format)?;
        tracing::info!("Result saved to '{}'.", path.display());
    }
    Ok(status)
}

// A stored value of another shape or type counts as a mismatch, so it gets overwritten.
fn matches_stored<V: Persist + PartialEq>(path: &Path, config: &CacheConfig, result: &V) -> Result<bool> {
    match load_typed::<V>(path, config.format) {
        Ok(stored) => Ok(&stored == result),
        Err(crate::Error::Conversion { expected, found }) => {
            tracing::debug!(expected, %found, "stored result has a different type");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Call `f`, persist its result under `fn_name` and hand the fresh result back.
///
/// The stored value is only used for comparison, never returned.
///
/// ```no_run
/// use memostash::{persist::save_result, CacheConfig, SaveFormat};
///
/// let config = CacheConfig::new(SaveFormat::Csv);
/// let total = save_result("total", &config, || 1 + 2).unwrap();
/// assert_eq!(total, 3);
/// ```
pub fn save_result<V, F>(fn_name: &str, config: &CacheConfig, f: F) -> Result<V>
where
    V: Persist + PartialEq + fmt::Debug,
    F: FnOnce() -> V,
{
    let result = f();
    persist_result(fn_name, config, &result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SaveFormat;

    #[test]
    fn status_messages() {
        assert_eq!(SaveStatus::Unchanged.to_string(), "already exists");
        assert_eq!(SaveStatus::Created.to_string(), "saved");
        assert_eq!(SaveStatus::Overwritten.to_string(), "saved");
        assert!(!SaveStatus::Unchanged.wrote_file());
    }

    #[test]
    fn type_change_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(SaveFormat::Binary).in_dir(dir.path());

        assert_eq!(
            persist_result("shape", &config, &vec![1u32, 2, 3]).unwrap(),
            SaveStatus::Created
        );
        assert_eq!(
            persist_result("shape", &config, &7u32).unwrap(),
            SaveStatus::Overwritten
        );
        assert_eq!(
            persist_result("shape", &config, &7u32).unwrap(),
            SaveStatus::Unchanged
        );
    }

    #[test]
    fn returns_fresh_result() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(SaveFormat::Csv).in_dir(dir.path());

        assert_eq!(save_result("answer", &config, || 41u64).unwrap(), 41);
        assert_eq!(save_result("answer", &config, || 42u64).unwrap(), 42);
    }
}
