use std::path::PathBuf;

/// Errors raised while persisting results or analyzing tables.
///
/// `UnsupportedFormat` is the only error produced by this crate's own rules. The remaining
/// variants wrap the failure of the library underneath (filesystem, CSV, spreadsheet, bincode)
/// and are passed through untranslated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A format name outside of `binary`, `csv` and `spreadsheet`.
    #[error("invalid format '{0}'. Supported formats: 'pickle', 'csv', 'excel'")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::XlsxError),

    #[error("binary encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("binary decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A CSV or spreadsheet cache file without a `value` header.
    #[error("no 'value' column in {}", .0.display())]
    MissingValueColumn(PathBuf),

    #[error("spreadsheet {} has no worksheet", .0.display())]
    EmptySheet(PathBuf),

    /// A stored value that cannot be turned into the requested Rust type.
    #[error("cannot convert {found} into {expected}")]
    Conversion {
        expected: &'static str,
        found: String,
    },

    #[error("no column named '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
