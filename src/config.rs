use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::format::SaveFormat;

/// What to do when a cache file from an earlier run already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Load the stored value and rewrite the file only if it differs.
    CompareFirst,
    /// Rewrite the file unconditionally.
    Always,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        OverwritePolicy::CompareFirst
    }
}

/// Where and how results are persisted.
///
/// Passed explicitly to every persistence call; there is no process-wide format setting.
///
/// # Examples
///
/// ```
/// use memostash::{CacheConfig, SaveFormat};
///
/// let config = CacheConfig::new(SaveFormat::Csv).in_dir("results");
/// assert!(config.cache_path("fib").ends_with("fib_result.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    #[serde(default, deserialize_with = "deserialize_format")]
    pub format: SaveFormat,
    #[serde(default = "current_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub policy: OverwritePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(SaveFormat::default())
    }
}

impl CacheConfig {
    pub fn new(format: SaveFormat) -> Self {
        Self {
            format,
            dir: current_dir(),
            policy: OverwritePolicy::default(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_policy(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the cache file for the function called `fn_name`.
    pub fn cache_path(&self, fn_name: &str) -> PathBuf {
        self.dir.join(cache_file_name(fn_name, self.format))
    }

    /// Parse a configuration from TOML.
    ///
    /// ```
    /// use memostash::{CacheConfig, OverwritePolicy, SaveFormat};
    ///
    /// let config = CacheConfig::from_toml("format = \"pickle\"\npolicy = \"always\"").unwrap();
    /// assert_eq!(config.format, SaveFormat::Binary);
    /// assert_eq!(config.policy, OverwritePolicy::Always);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// `{fn_name}_result.{ext}`
pub fn cache_file_name(fn_name: &str, format: SaveFormat) -> String {
    format!("{}_result.{}", fn_name, format.extension())
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

fn deserialize_format<'de, D>(deserializer: D) -> std::result::Result<SaveFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse()
        .map_err(|e: Error| serde::de::Error::custom(e.to_string()))
}
