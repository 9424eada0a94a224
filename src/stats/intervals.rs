use crate::dataset::{ListingTable, NumericColumn};
use crate::error::{PropstatError, Result};
use crate::stats::math::students_t_critical;
use serde::Serialize;

/// A Student-t confidence interval around a sample mean.
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub std_dev: f64,
    pub std_error: f64,
    pub margin: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence: f64,
}

/// Computes the confidence interval for a sample mean at the given level.
///
/// Margin of error is the t critical value at (1 + level) / 2 with n - 1
/// degrees of freedom, times the standard error of the mean.
pub fn confidence_interval(values: &[f64], level: f64) -> Result<ConfidenceInterval> {
    if !(0.0..1.0).contains(&level) || level == 0.0 {
        return Err(PropstatError::Computation(format!(
            "confidence level must be inside (0, 1), got {}",
            level
        )));
    }
    let n = values.len();
    if n < 2 {
        return Err(PropstatError::Computation(
            "confidence interval requires at least two values".to_string(),
        ));
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let std_dev = (ss / (n - 1) as f64).sqrt();
    let std_error = std_dev / (n as f64).sqrt();

    let t = students_t_critical((1.0 + level) / 2.0, (n - 1) as f64);
    let margin = t * std_error;

    Ok(ConfidenceInterval {
        mean,
        std_dev,
        std_error,
        margin,
        lower: mean - margin,
        upper: mean + margin,
        confidence: level,
    })
}

/// 95% confidence interval, the dashboard default.
pub fn confidence_interval_95(values: &[f64]) -> Result<ConfidenceInterval> {
    confidence_interval(values, 0.95)
}

/// Confidence intervals for every numeric column of the cleaned table.
pub fn intervals_table(
    table: &ListingTable,
    level: f64,
) -> Result<Vec<(String, ConfidenceInterval)>> {
    NumericColumn::ALL
        .iter()
        .map(|&column| {
            Ok((
                column.as_str().to_string(),
                confidence_interval(&table.column(column), level)?,
            ))
        })
        .collect()
}
