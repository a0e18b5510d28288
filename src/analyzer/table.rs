use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Column-oriented table of numbers, in the spirit of a dataframe.
///
/// Rows remember their position in the source (`index`), so a ranked or filtered table can
/// still be related to the file it came from. Missing cells are `NaN`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: Vec<usize>,
}

impl Table {
    /// Build a table from named columns of equal length.
    ///
    /// # Panics
    ///
    /// If the columns differ in length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Self {
        let len = columns.first().map_or(0, |(_, values)| values.len());
        let mut table = Table {
            index: (0..len).collect(),
            ..Table::default()
        };
        for (name, values) in columns {
            assert_eq!(values.len(), len, "columns must have equal length");
            table.names.push(name.into());
            table.columns.push(values);
        }
        table
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let table = Self::from_csv_reader(std::fs::File::open(path)?)?;
        tracing::debug!(
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_cols(),
            "loaded table"
        );
        Ok(table)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns = vec![Vec::new(); names.len()];

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for (col, cell) in record.iter().enumerate() {
                let value = if cell.is_empty() {
                    f64::NAN
                } else {
                    cell.parse::<f64>().map_err(|_| Error::Parse {
                        row,
                        column: names[col].clone(),
                        value: cell.to_string(),
                    })?
                };
                columns[col].push(value);
            }
        }

        let len = columns.first().map_or(0, Vec::len);
        Ok(Table {
            names,
            columns,
            index: (0..len).collect(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Source row positions of the rows, in table order.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        Ok(&self.columns[self.position(name)?])
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[i]).collect()
    }

    /// Add a column, or replace the values of an existing one with the same name.
    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) {
        assert_eq!(values.len(), self.n_rows(), "column length must match the table");
        match self.position(name) {
            Ok(i) => self.columns[i] = values,
            Err(_) => {
                self.names.push(name.to_string());
                self.columns.push(values);
            }
        }
    }

    /// Drop rows equal in every column to an earlier row. Returns how many were dropped.
    pub fn drop_duplicates(&mut self) -> usize {
        let mut seen = HashSet::new();
        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&i| seen.insert(self.row(i).into_iter().map(cell_key).collect::<Vec<_>>()))
            .collect();
        let dropped = self.n_rows() - keep.len();
        if dropped > 0 {
            *self = self.take_rows(&keep);
        }
        dropped
    }

    /// Row-wise sum of `names`, skipping missing cells.
    pub fn sum_columns(&self, names: &[&str]) -> Result<Vec<f64>> {
        let columns = names
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..self.n_rows())
            .map(|i| {
                columns
                    .iter()
                    .map(|c| c[i])
                    .filter(|v| !v.is_nan())
                    .sum::<f64>()
            })
            .collect())
    }

    /// Pearson correlation of two columns over the rows where both are present.
    ///
    /// `NaN` when fewer than two such rows exist or either column is constant.
    pub fn correlation(&self, a: &str, b: &str) -> Result<f64> {
        let xs = self.column(a)?;
        let ys = self.column(b)?;
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter(|(x, y)| !x.is_nan() && !y.is_nan())
            .map(|(x, y)| (*x, *y))
            .collect();
        Ok(pearson(&pairs))
    }

    /// The `n` rows with the largest values in `column`, largest first.
    ///
    /// Ties keep table order; rows missing the value are skipped.
    pub fn nlargest(&self, n: usize, column: &str) -> Result<Table> {
        let values = self.column(column)?;
        let mut order: Vec<usize> = (0..self.n_rows()).filter(|&i| !values[i].is_nan()).collect();
        order.sort_by(|&i, &j| values[j].partial_cmp(&values[i]).unwrap_or(std::cmp::Ordering::Equal));
        order.truncate(n);
        Ok(self.take_rows(&order))
    }

    /// Keep only `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            columns.push(self.column(name)?.to_vec());
        }
        Ok(Table {
            names: names.iter().map(|n| n.to_string()).collect(),
            columns,
            index: self.index.clone(),
        })
    }

    /// Rename columns through `mapping`; names it does not cover stay as they are.
    pub fn rename<F>(mut self, mapping: F) -> Table
    where
        F: Fn(&str) -> Option<&'static str>,
    {
        for name in self.names.iter_mut() {
            if let Some(new_name) = mapping(name) {
                *name = new_name.to_string();
            }
        }
        self
    }

    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<usize> = (0..self.n_rows().min(n)).collect();
        self.take_rows(&rows)
    }

    fn take_rows(&self, rows: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&i| c[i]).collect())
                .collect(),
            index: rows.iter().map(|&i| self.index[i]).collect(),
        }
    }
}

// Bit pattern used to compare cells: all NaNs are equal, and so are 0.0 and -0.0.
fn cell_key(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).max(-1.0).min(1.0)
}

pub(crate) fn format_cell(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.iter().map(|&v| format_cell(v)).collect())
            .collect();
        let index_width = self
            .index
            .iter()
            .map(|i| i.to_string().len())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self
            .names
            .iter()
            .zip(&cells)
            .map(|(name, column)| column.iter().map(String::len).chain(Some(name.len())).max().unwrap_or(0))
            .collect();

        write!(f, "{:width$}", "", width = index_width)?;
        for (name, width) in self.names.iter().zip(&widths) {
            write!(f, "  {:>width$}", name, width = *width)?;
        }
        writeln!(f)?;
        for (row, source) in self.index.iter().enumerate() {
            write!(f, "{:>width$}", source, width = index_width)?;
            for (column, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", column[row], width = *width)?;
            }
            writeln!(f)?;
        }
        write!(f, "[{} rows x {} columns]", self.n_rows(), self.n_cols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("age", vec![30.0, 45.0, 30.0, 61.0, 45.0]),
            ("limit_bal", vec![1000.0, 5000.0, 1000.0, 8000.0, 2000.0]),
        ])
    }

    #[test]
    fn parses_csv_with_missing_cells() {
        let csv = "age,limit_bal\n30,1000\n41,\n";
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("age").unwrap(), &[30.0, 41.0]);
        assert!(table.column("limit_bal").unwrap()[1].is_nan());
    }

    #[test]
    fn rejects_non_numeric_cells() {
        let csv = "age,limit_bal\n30,lots\n";
        match Table::from_csv_reader(csv.as_bytes()) {
            Err(Error::Parse { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "limit_bal");
                assert_eq!(value, "lots");
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn drops_exact_duplicates_once() {
        let mut table = sample();
        assert_eq!(table.drop_duplicates(), 1);
        assert_eq!(table.n_rows(), 4);
        assert_eq!(table.index(), &[0, 1, 3, 4]);
        assert_eq!(table.drop_duplicates(), 0);
        assert_eq!(table.n_rows(), 4);
    }

    #[test]
    fn duplicate_detection_treats_nan_as_equal() {
        let mut table = Table::from_columns(vec![("x", vec![f64::NAN, f64::NAN, 0.0, -0.0])]);
        assert_eq!(table.drop_duplicates(), 2);
    }

    #[test]
    fn sums_skip_missing_values() {
        let table = Table::from_columns(vec![("a", vec![1.0, f64::NAN]), ("b", vec![2.0, 3.0])]);
        assert_eq!(table.sum_columns(&["a", "b"]).unwrap(), vec![3.0, 3.0]);
    }

    #[test]
    fn perfect_correlation() {
        let table = Table::from_columns(vec![
            ("x", vec![1.0, 2.0, 3.0, f64::NAN]),
            ("y", vec![2.0, 4.0, 6.0, 100.0]),
            ("z", vec![3.0, 2.0, 1.0, 0.0]),
        ]);
        assert!((table.correlation("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((table.correlation("x", "z").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_has_no_correlation() {
        let table = Table::from_columns(vec![("x", vec![1.0, 1.0]), ("y", vec![2.0, 4.0])]);
        assert!(table.correlation("x", "y").unwrap().is_nan());
    }

    #[test]
    fn nlargest_keeps_first_of_ties() {
        let top = sample().nlargest(3, "age").unwrap();
        assert_eq!(top.column("age").unwrap(), &[61.0, 45.0, 45.0]);
        assert_eq!(top.index(), &[3, 1, 4]);
    }

    #[test]
    fn missing_column_is_reported() {
        match sample().column("income") {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "income"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn select_and_rename() {
        let table = sample()
            .select(&["limit_bal"])
            .unwrap()
            .rename(|name| if name == "limit_bal" { Some("limit") } else { None });
        assert_eq!(table.names(), &["limit".to_string()]);
    }

    #[test]
    fn display_lists_index_and_shape() {
        let text = sample().head(2).to_string();
        assert!(text.contains("age"));
        assert!(text.contains("5000"));
        assert!(text.ends_with("[2 rows x 2 columns]"));
    }
}
