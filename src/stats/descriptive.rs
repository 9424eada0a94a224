use crate::dataset::{ListingTable, NumericColumn};
use crate::error::{PropstatError, Result};
use serde::Serialize;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    /// Sample-adjusted skewness; NaN below 3 observations.
    pub skewness: f64,
    /// Sample-adjusted excess kurtosis; NaN below 4 observations.
    pub kurtosis: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub stats: DescriptiveStats,
}

/// Computes descriptive statistics over a sample.
pub fn describe(values: &[f64]) -> Result<DescriptiveStats> {
    if values.is_empty() {
        return Err(PropstatError::Computation(
            "descriptive statistics require at least one value".to_string(),
        ));
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let std_dev = sample_std(values, mean);

    Ok(DescriptiveStats {
        count: n,
        mean,
        median: quantile_sorted(&sorted, 0.5),
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
        q1: quantile_sorted(&sorted, 0.25),
        q3: quantile_sorted(&sorted, 0.75),
        skewness: sample_skewness(values, mean, std_dev),
        kurtosis: sample_kurtosis(values, mean, std_dev),
    })
}

/// Descriptive statistics for every numeric column of the cleaned table.
pub fn describe_table(table: &ListingTable) -> Result<Vec<ColumnSummary>> {
    NumericColumn::ALL
        .iter()
        .map(|&column| {
            Ok(ColumnSummary {
                column: column.as_str().to_string(),
                stats: describe(&table.column(column))?,
            })
        })
        .collect()
}

// Quantile with linear interpolation between order statistics, the
// convention the rest of the dashboard's numbers were produced with.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = pos - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

// Adjusted Fisher-Pearson standardized moment coefficient G1.
fn sample_skewness(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    let n = values.len() as f64;
    if n < 3.0 || std_dev == 0.0 {
        return f64::NAN;
    }
    let m3: f64 = values.iter().map(|v| ((v - mean) / std_dev).powi(3)).sum();
    n / ((n - 1.0) * (n - 2.0)) * m3
}

// Sample excess kurtosis G2.
fn sample_kurtosis(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    let n = values.len() as f64;
    if n < 4.0 || std_dev == 0.0 {
        return f64::NAN;
    }
    let m4: f64 = values.iter().map(|v| ((v - mean) / std_dev).powi(4)).sum();
    n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * m4
        - 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
}
