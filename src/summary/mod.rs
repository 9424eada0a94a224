mod encoder;
mod ranker;
mod sentences;

pub use encoder::{HttpEncoder, SentenceEncoder};
pub use ranker::{market_predictions, market_summary, rank_sentences};
pub use sentences::{build_prediction_sentences, build_summary_sentences};
