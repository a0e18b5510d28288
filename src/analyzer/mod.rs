//! Summaries of a credit-card client dataset.

mod chart;
mod education;
mod table;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use chart::{Bin, Dashboard, Histogram, Panel, Scatter};
pub use education::Education;
pub use table::Table;

pub const AGE: &str = "age";
pub const LIMIT_BAL: &str = "limit_bal";
pub const TOTAL_BILL: &str = "total_bill";
pub const BILL_COLUMNS: [&str; 6] = [
    "bill_amt1",
    "bill_amt2",
    "bill_amt3",
    "bill_amt4",
    "bill_amt5",
    "bill_amt6",
];

const HISTOGRAM_BINS: usize = 30;

/// Loads a credit dataset from CSV and derives a few summaries from it.
///
/// Until [`load_data`](Self::load_data) runs the table is empty, and anything that needs a
/// column reports it as missing.
#[derive(Debug, Clone)]
pub struct CreditDataAnalyzer {
    file_path: PathBuf,
    data: Table,
}

impl CreditDataAnalyzer {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        CreditDataAnalyzer {
            file_path: file_path.into(),
            data: Table::default(),
        }
    }

    /// Analyze a table that is already in memory.
    pub fn from_table(data: Table) -> Self {
        CreditDataAnalyzer {
            file_path: PathBuf::new(),
            data,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn data(&self) -> &Table {
        &self.data
    }

    pub fn load_data(&mut self) -> Result<()> {
        self.data = Table::from_csv_path(&self.file_path)?;
        Ok(())
    }

    /// Returns the number of rows removed.
    pub fn remove_duplicates(&mut self) -> usize {
        let removed = self.data.drop_duplicates();
        tracing::debug!(removed, remaining = self.data.n_rows(), "removed duplicate rows");
        removed
    }

    /// Correlation between client age and credit limit.
    pub fn calculate_correlation(&self) -> Result<f64> {
        self.data.correlation(AGE, LIMIT_BAL)
    }

    pub fn add_total_bill_column(&mut self) -> Result<()> {
        let total = self.data.sum_columns(&BILL_COLUMNS)?;
        self.data.insert_column(TOTAL_BILL, total);
        Ok(())
    }

    /// The `n` oldest clients with their credit limit, total bill (once derived) and
    /// education, the education columns named by their labels.
    pub fn get_top_oldest_clients(&self, n: usize) -> Result<Table> {
        let mut columns = vec![LIMIT_BAL, AGE];
        if self.data.column(TOTAL_BILL).is_ok() {
            columns.push(TOTAL_BILL);
        }
        columns.extend(Education::ALL.iter().map(|e| e.column()));

        Ok(self
            .data
            .nlargest(n, AGE)?
            .select(&columns)?
            .rename(Education::relabel))
    }

    /// Histograms of credit limit and age, credit limit against age, and an empty panel.
    pub fn plot_histograms_and_scatter(&self) -> Result<Dashboard> {
        let limit = self.data.column(LIMIT_BAL)?;
        let age = self.data.column(AGE)?;
        Ok(Dashboard {
            panels: [
                Panel::Histogram(Histogram::new(
                    "Credit Limit Histogram",
                    "Credit Limit",
                    limit,
                    HISTOGRAM_BINS,
                )),
                Panel::Histogram(Histogram::new("Age Histogram", "Age", age, HISTOGRAM_BINS)),
                Panel::Scatter(Scatter::new(
                    "Credit Limit by Age",
                    "Age",
                    "Credit Limit",
                    age,
                    limit,
                )),
                Panel::Blank,
            ],
        })
    }
}
