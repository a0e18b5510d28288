//! Function decorators as attribute macros: `#[memoize]` keeps results in memory,
//! `#[save_result]` writes them to disk and tells whether they changed since the last run.
//!
//! ```
//! use memostash::memoize;
//!
//! #[memoize]
//! fn fib(n: u64) -> u64 {
//!     if n <= 1 { n } else { fib(n - 1) + fib(n - 2) }
//! }
//!
//! assert_eq!(fib(40), 102_334_155);
//! ```
//!
//! The [`analyzer`] module is unrelated to caching: it summarizes a credit-card dataset.

// Lets the attribute macros refer to `::memostash` from inside this crate too.
extern crate self as memostash;

pub use memostash_inner::{memoize, save_result};

pub use lazy_static;
#[cfg(feature = "full")]
pub use lru;

pub mod analyzer;
pub mod config;
pub mod disk;
mod error;
pub mod fib;
pub mod format;
#[cfg(feature = "logging")]
pub mod logging;
pub mod persist;
pub mod timing;
pub mod tree;
pub mod value;

pub use config::{cache_file_name, CacheConfig, OverwritePolicy};
pub use disk::{load_result_from_disk, load_typed, save_result_to_disk};
pub use error::{Error, Result};
pub use format::SaveFormat;
pub use persist::{persist_result, SaveStatus};
pub use timing::{measure_time, timed, Timed};
pub use tree::Tree;
pub use value::{Column, Persist, Scalar, ScalarValue};
