pub mod descriptive;
pub mod distribution;
pub mod intervals;
pub mod math;
pub mod normality;
pub mod regression;

pub use descriptive::{ColumnSummary, DescriptiveStats, describe, describe_table};
pub use distribution::{Histogram, ecdf, histogram, normal_curve};
pub use intervals::{ConfidenceInterval, confidence_interval, confidence_interval_95, intervals_table};
pub use normality::{DistributionAnalysis, NormalFit, TestResult, analyze_distribution};
pub use regression::{Prediction, RegressionModel, RegressionTerm, fit_ols, fit_ols_columns};
