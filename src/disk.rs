//! Reading and writing cache files.

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Formula, Workbook, Worksheet};

use crate::error::{Error, Result};
use crate::format::SaveFormat;
use crate::value::{Column, Persist, Scalar};

/// Header of the single column in CSV and spreadsheet cache files.
pub const VALUE_HEADER: &str = "value";

/// Write `result` to `path`, replacing whatever is there. Missing parent directories are created.
pub fn save_result_to_disk<V: Persist>(path: &Path, result: &V, format: SaveFormat) -> Result<()> {
    let column = result.to_column();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %path.display(), %format, rows = column.len(), "writing cache file");
    match format {
        SaveFormat::Binary => write_binary(path, &column),
        SaveFormat::Csv => write_csv(path, &column),
        SaveFormat::Spreadsheet => write_spreadsheet(path, &column),
    }
}

/// Read the column stored at `path`. Use [`Persist::from_column`] to get a typed value back.
pub fn load_result_from_disk(path: &Path, format: SaveFormat) -> Result<Column> {
    tracing::debug!(path = %path.display(), %format, "reading cache file");
    match format {
        SaveFormat::Binary => read_binary(path),
        SaveFormat::Csv => read_csv(path),
        SaveFormat::Spreadsheet => read_spreadsheet(path),
    }
}

/// [`load_result_from_disk`] followed by the conversion to `V`.
pub fn load_typed<V: Persist>(path: &Path, format: SaveFormat) -> Result<V> {
    V::from_column(load_result_from_disk(path, format)?)
}

fn write_binary(path: &Path, column: &Column) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serde::encode_into_std_write(column, &mut writer, bincode::config::standard())?;
    writer.flush()?;
    Ok(())
}

fn read_binary(path: &Path) -> Result<Column> {
    let mut reader = BufReader::new(File::open(path)?);
    let column = bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
    Ok(column)
}

fn write_csv(path: &Path, column: &Column) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&[VALUE_HEADER])?;
    for scalar in column {
        writer.write_record(&[scalar.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn read_csv(path: &Path) -> Result<Column> {
    let mut reader = csv::Reader::from_path(path)?;
    let index = reader
        .headers()?
        .iter()
        .position(|h| h == VALUE_HEADER)
        .ok_or_else(|| Error::MissingValueColumn(path.to_path_buf()))?;

    let mut column = Column::new();
    for record in reader.records() {
        let record = record?;
        column.push(Scalar::Text(record.get(index).unwrap_or("").to_string()));
    }
    Ok(column)
}

fn write_spreadsheet(path: &Path, column: &Column) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, VALUE_HEADER)?;
    for (i, scalar) in column.iter().enumerate() {
        // Rows past u32 are past the sheet's row limit too, which the writer reports.
        let row = u32::try_from(i + 1).unwrap_or(u32::MAX);
        write_cell(worksheet, row, scalar)?;
    }
    workbook.save(path)?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, scalar: &Scalar) -> Result<()> {
    match scalar {
        Scalar::Int(_) | Scalar::UInt(_) => match scalar.exact_float() {
            Some(v) => worksheet.write_number(row, 0, v)?,
            // Sheet numbers are doubles; wider integers are kept as their digits.
            None => worksheet.write_string(row, 0, scalar.to_string())?,
        },
        Scalar::Float(v) => worksheet.write_number(row, 0, *v)?,
        Scalar::Bool(v) => worksheet.write_boolean(row, 0, *v)?,
        // An empty string cell is dropped on write, so store a formula that evaluates to "".
        Scalar::Text(v) if v.is_empty() => {
            worksheet.write_formula(row, 0, Formula::new("=\"\"").set_result(""))?
        }
        Scalar::Text(v) => worksheet.write_string(row, 0, v.as_str())?,
    };
    Ok(())
}

fn read_spreadsheet(path: &Path) -> Result<Column> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::EmptySheet(path.to_path_buf()))??;

    let mut rows = range.rows();
    let index = rows
        .next()
        .and_then(|header| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s == VALUE_HEADER))
        })
        .ok_or_else(|| Error::MissingValueColumn(path.to_path_buf()))?;

    Ok(rows
        .map(|row| row.get(index).map_or(Scalar::Text(String::new()), cell_scalar))
        .collect())
}

fn cell_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Int(i) => Scalar::Int(*i),
        Data::Float(f) => Scalar::Float(*f),
        Data::Bool(b) => Scalar::Bool(*b),
        Data::String(s) => Scalar::Text(s.clone()),
        Data::Empty => Scalar::Text(String::new()),
        other => Scalar::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Column {
        vec![
            Scalar::Int(2584),
            Scalar::Float(0.5),
            Scalar::Bool(true),
            Scalar::Text("fib".into()),
        ]
    }

    #[test]
    fn binary_keeps_exact_scalars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed_result.bin");
        save_result_to_disk(&path, &sample(), SaveFormat::Binary).unwrap();
        assert_eq!(load_result_from_disk(&path, SaveFormat::Binary).unwrap(), sample());
    }

    #[test]
    fn csv_writes_value_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed_result.csv");
        save_result_to_disk(&path, &sample(), SaveFormat::Csv).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("value\n2584\n0.5\ntrue\nfib"));
    }

    #[test]
    fn csv_cells_come_back_as_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes_result.csv");
        let codes = vec!["007".to_string(), "1.0".into(), "True".into(), "".into()];
        save_result_to_disk(&path, &codes, SaveFormat::Csv).unwrap();

        let column = load_result_from_disk(&path, SaveFormat::Csv).unwrap();
        assert_eq!(column[0], Scalar::Text("007".into()));
        assert_eq!(Vec::<String>::from_column(column).unwrap(), codes);
    }

    #[test]
    fn spreadsheet_reads_back_numbers_as_floats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed_result.xlsx");
        save_result_to_disk(&path, &sample(), SaveFormat::Spreadsheet).unwrap();

        let column = load_result_from_disk(&path, SaveFormat::Spreadsheet).unwrap();
        assert_eq!(column.len(), 4);
        assert_eq!(u64::from_column(vec![column[0].clone()]).unwrap(), 2584);
        assert_eq!(column[2], Scalar::Bool(true));
        assert_eq!(column[3], Scalar::Text("fib".into()));
    }

    #[test]
    fn spreadsheet_keeps_wide_integers_and_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges_result.xlsx");
        let column = vec![
            Scalar::UInt(u64::MAX),
            Scalar::Int(i64::MIN),
            Scalar::Int((1 << 53) + 1),
            Scalar::Text(String::new()),
        ];
        save_result_to_disk(&path, &column, SaveFormat::Spreadsheet).unwrap();

        let loaded = load_result_from_disk(&path, SaveFormat::Spreadsheet).unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(u64::from_column(vec![loaded[0].clone()]).unwrap(), u64::MAX);
        assert_eq!(i64::from_column(vec![loaded[1].clone()]).unwrap(), i64::MIN);
        assert_eq!(i64::from_column(vec![loaded[2].clone()]).unwrap(), (1 << 53) + 1);
        assert_eq!(String::from_column(vec![loaded[3].clone()]).unwrap(), "");
    }

    #[test]
    fn csv_without_value_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "result\n1\n").unwrap();
        match load_result_from_disk(&path, SaveFormat::Csv) {
            Err(Error::MissingValueColumn(p)) => assert_eq!(p, path),
            other => panic!("expected MissingValueColumn, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent_result.bin");
        assert!(matches!(
            load_result_from_disk(&path, SaveFormat::Binary),
            Err(Error::Io(_))
        ));
    }
}
