use thiserror::Error;

/// Errors surfaced by the propstat library.
///
/// Field-level parse failures are not represented here: an unparseable price
/// or area string becomes a missing value and is imputed by the cleaning
/// pipeline. Encoder failures are absorbed by the summary ranker with a
/// logged warning; they only surface when the encoder is called directly.
#[derive(Debug, Error)]
pub enum PropstatError {
    /// Source dataset missing, unreadable, or unwritable
    #[error("dataset i/o failed: {0}")]
    DataLoad(#[from] std::io::Error),

    /// CSV could not be read or written
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the input
    #[error("required column '{column}' not found in dataset")]
    DataShape { column: String },

    /// A statistic could not be computed from the given data
    #[error("computation failed: {0}")]
    Computation(String),

    /// Embedding client construction or request failed
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Report serialization failed
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PropstatError>;
