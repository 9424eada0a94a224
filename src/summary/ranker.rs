use crate::dataset::ListingTable;
use crate::summary::encoder::SentenceEncoder;
use crate::summary::sentences::{build_prediction_sentences, build_summary_sentences};
use log::{debug, warn};

const TOP_SENTENCES: usize = 3;

/// Selects the sentences most representative of the whole set.
///
/// Each sentence is embedded, the centroid of all embeddings is taken, and
/// sentences are ranked by cosine similarity to that centroid, descending.
/// Without an encoder, or when encoding fails, the first `TOP_SENTENCES`
/// sentences are returned in their original order; encoder unavailability
/// never surfaces as an error here.
pub fn rank_sentences(
    encoder: Option<&dyn SentenceEncoder>,
    sentences: &[String],
) -> Vec<String> {
    if sentences.len() <= TOP_SENTENCES {
        return sentences.to_vec();
    }

    let Some(encoder) = encoder else {
        warn!("No sentence encoder available, falling back to unranked summary");
        return sentences[..TOP_SENTENCES].to_vec();
    };

    let embeddings = match encoder.encode(sentences) {
        Ok(embeddings) if embeddings.len() == sentences.len() => embeddings,
        Ok(embeddings) => {
            warn!(
                "Encoder returned {} embeddings for {} sentences, falling back to unranked summary",
                embeddings.len(),
                sentences.len()
            );
            return sentences[..TOP_SENTENCES].to_vec();
        }
        Err(e) => {
            warn!("Sentence encoding failed ({}), falling back to unranked summary", e);
            return sentences[..TOP_SENTENCES].to_vec();
        }
    };

    let centroid = mean_vector(&embeddings);
    let mut ranked: Vec<(usize, f32)> = embeddings
        .iter()
        .enumerate()
        .map(|(i, embedding)| (i, cosine_similarity(&centroid, embedding)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    debug!("Sentence similarities to centroid: {:?}", ranked);

    ranked
        .into_iter()
        .take(TOP_SENTENCES)
        .map(|(i, _)| sentences[i].clone())
        .collect()
}

/// The ranked market summary narrative.
pub fn market_summary(encoder: Option<&dyn SentenceEncoder>, table: &ListingTable) -> String {
    bulleted("Market Analysis Summary:", rank_sentences(encoder, &build_summary_sentences(table)))
}

/// The ranked market outlook narrative.
pub fn market_predictions(encoder: Option<&dyn SentenceEncoder>, table: &ListingTable) -> String {
    bulleted("Market Predictions:", rank_sentences(encoder, &build_prediction_sentences(table)))
}

fn bulleted(heading: &str, sentences: Vec<String>) -> String {
    let mut text = format!("{}\n\n", heading);
    for sentence in sentences {
        text.push_str("- ");
        text.push_str(&sentence);
        text.push('\n');
    }
    text
}

fn mean_vector(embeddings: &[Vec<f32>]) -> Vec<f32> {
    let dims = embeddings.first().map(Vec::len).unwrap_or(0);
    let mut centroid = vec![0.0f32; dims];
    for embedding in embeddings {
        for (slot, value) in centroid.iter_mut().zip(embedding) {
            *slot += value;
        }
    }
    let n = embeddings.len() as f32;
    for slot in centroid.iter_mut() {
        *slot /= n;
    }
    centroid
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
