//! Chart panels rendered as text.

use std::fmt;

use super::table::format_cell;

const BAR_WIDTH: usize = 40;
const PLOT_WIDTH: usize = 60;
const PLOT_HEIGHT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Count `values` into `bins` equal-width bins spanning their range. Missing values are
    /// ignored; the last bin includes the maximum.
    pub fn new(title: &str, x_label: &str, values: &[f64], bins: usize) -> Self {
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let mut histogram = Histogram {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: "Count".to_string(),
            bins: Vec::new(),
        };
        if present.is_empty() || bins == 0 {
            return histogram;
        }

        let mut lo = present.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        histogram.bins = (0..bins)
            .map(|i| Bin {
                start: lo + width * i as f64,
                end: lo + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for v in present {
            let i = (((v - lo) / width) as usize).min(bins - 1);
            histogram.bins[i].count += 1;
        }
        histogram
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{} / {}", self.x_label, self.y_label)?;
        let max = self.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        for bin in &self.bins {
            let bar = "#".repeat(bin.count * BAR_WIDTH / max);
            writeln!(
                f,
                "{:>12} .. {:<12} |{:<width$}| {}",
                format_cell(bin.start),
                format_cell(bin.end),
                bar,
                bin.count,
                width = BAR_WIDTH
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

impl Scatter {
    /// Pairs `xs[i]` with `ys[i]`, skipping pairs with a missing side.
    pub fn new(title: &str, x_label: &str, y_label: &str, xs: &[f64], ys: &[f64]) -> Self {
        Scatter {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points: xs
                .iter()
                .zip(ys)
                .filter(|(x, y)| !x.is_nan() && !y.is_nan())
                .map(|(x, y)| (*x, *y))
                .collect(),
        }
    }
}

impl fmt::Display for Scatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.points.is_empty() {
            return writeln!(f, "(no data)");
        }

        let bounds = |pick: fn(&(f64, f64)) -> f64| {
            self.points.iter().map(pick).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
        };
        let (x_lo, x_hi) = bounds(|p| p.0);
        let (y_lo, y_hi) = bounds(|p| p.1);
        let scale = |v: f64, lo: f64, hi: f64, cells: usize| {
            if hi > lo {
                (((v - lo) / (hi - lo)) * (cells - 1) as f64).round() as usize
            } else {
                cells / 2
            }
        };

        let mut grid = vec![vec![' '; PLOT_WIDTH]; PLOT_HEIGHT];
        for &(x, y) in &self.points {
            let col = scale(x, x_lo, x_hi, PLOT_WIDTH);
            let row = PLOT_HEIGHT - 1 - scale(y, y_lo, y_hi, PLOT_HEIGHT);
            grid[row][col] = '*';
        }

        writeln!(f, "{} (from {} to {})", self.y_label, format_cell(y_lo), format_cell(y_hi))?;
        for line in grid {
            writeln!(f, "|{}", line.into_iter().collect::<String>())?;
        }
        writeln!(f, "+{}", "-".repeat(PLOT_WIDTH))?;
        writeln!(f, "{} (from {} to {})", self.x_label, format_cell(x_lo), format_cell(x_hi))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Histogram(Histogram),
    Scatter(Scatter),
    Blank,
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Panel::Histogram(h) => fmt::Display::fmt(h, f),
            Panel::Scatter(s) => fmt::Display::fmt(s, f),
            Panel::Blank => Ok(()),
        }
    }
}

/// A 2x2 grid of panels, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub panels: [Panel; 4],
}

impl Dashboard {
    pub fn panel(&self, row: usize, col: usize) -> &Panel {
        &self.panels[row * 2 + col]
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, panel) in self.panels.iter().enumerate() {
            if let Panel::Blank = panel {
                continue;
            }
            writeln!(f, "[{}, {}]", i / 2, i % 2)?;
            writeln!(f, "{}", panel)?;
        }
        Ok(())
    }
}
