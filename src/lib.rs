pub mod cleaning;
pub mod dataset;
pub mod error;
pub mod parsers;
pub mod stats;
pub mod summary;
pub mod utils;

use crate::dataset::{ListingTable, NumericColumn};
use crate::error::{PropstatError, Result};
use crate::summary::SentenceEncoder;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

pub use crate::cleaning::preprocess_file;

/// Everything the dashboard renders for one analysis pass.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub listings: usize,
    pub descriptive: Vec<stats::ColumnSummary>,
    pub confidence_intervals: Vec<(String, stats::ConfidenceInterval)>,
    pub price_distribution: stats::DistributionAnalysis,
    pub price_histogram: stats::Histogram,
    pub regression: stats::RegressionModel,
    pub location_counts: Vec<(String, usize)>,
    pub summary: String,
    pub predictions: String,
}

/// Runs the full statistical analysis over a cleaned table.
///
/// The table is read, never mutated; the report is an independent
/// structure. Computation failures (empty selection, collinear features)
/// propagate as labeled errors.
pub fn analyze_table(
    table: &ListingTable,
    encoder: Option<&dyn SentenceEncoder>,
    confidence: f64,
) -> Result<MarketReport> {
    if table.is_empty() {
        return Err(PropstatError::Computation(
            "cannot analyze an empty table".to_string(),
        ));
    }

    info!(
        "Analyzing {} listings at {:.0}% confidence",
        table.len(),
        confidence * 100.0
    );

    let prices = table.column(NumericColumn::Price);

    let descriptive = stats::describe_table(table)?;
    let confidence_intervals = stats::intervals_table(table, confidence)?;
    let price_distribution = stats::analyze_distribution(&prices)?;
    let price_histogram = stats::histogram(&prices, 30)?;

    debug!("Fitting price regression on size, bedrooms and washrooms");
    let regression = stats::fit_ols_columns(
        table,
        NumericColumn::Price,
        &[
            NumericColumn::Marla,
            NumericColumn::Bedrooms,
            NumericColumn::Washrooms,
        ],
    )?;

    let summary = summary::market_summary(encoder, table);
    let predictions = summary::market_predictions(encoder, table);

    info!("Analysis complete");
    Ok(MarketReport {
        listings: table.len(),
        descriptive,
        confidence_intervals,
        price_distribution,
        price_histogram,
        regression,
        location_counts: table.location_counts(),
        summary,
        predictions,
    })
}

/// Preprocesses a listings CSV and writes the full analysis report as JSON.
pub fn analyze_file(
    input: &Path,
    report_path: &Path,
    cleaned_path: Option<&Path>,
    encoder: Option<&dyn SentenceEncoder>,
    confidence: f64,
) -> Result<()> {
    info!("Starting market analysis for {:?}", input);

    let table = preprocess_file(input, cleaned_path)?;
    let report = analyze_table(&table, encoder, confidence)?;
    utils::io::export_report_json(&report, report_path)?;

    info!(
        "Report for {} listings written to {:?}",
        report.listings, report_path
    );
    Ok(())
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
