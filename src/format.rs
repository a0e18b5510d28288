use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// On-disk representation of a cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveFormat {
    /// bincode-encoded scalar column.
    Binary,
    /// Comma-separated table with a single `value` column.
    Csv,
    /// `.xlsx` workbook whose first sheet holds a single `value` column.
    Spreadsheet,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 3] = [SaveFormat::Binary, SaveFormat::Csv, SaveFormat::Spreadsheet];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Binary => "bin",
            SaveFormat::Csv => "csv",
            SaveFormat::Spreadsheet => "xlsx",
        }
    }
}

impl Default for SaveFormat {
    fn default() -> Self {
        SaveFormat::Spreadsheet
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveFormat::Binary => "binary",
            SaveFormat::Csv => "csv",
            SaveFormat::Spreadsheet => "spreadsheet",
        };
        f.write_str(name)
    }
}

impl FromStr for SaveFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pickle" | "binary" | "bin" => Ok(SaveFormat::Binary),
            "csv" => Ok(SaveFormat::Csv),
            "excel" | "xlsx" | "spreadsheet" => Ok(SaveFormat::Spreadsheet),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}
