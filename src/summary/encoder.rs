use crate::error::{PropstatError, Result};
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Turns sentences into fixed-length embedding vectors.
///
/// Constructed explicitly and passed into the ranker, so tests can
/// substitute a stub and nothing holds process-global model state.
pub trait SentenceEncoder {
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

/// Blocking embeddings client for OpenAI-compatible endpoints.
pub struct HttpEncoder {
    client: Client,
    endpoint: String,
    model: String,
    max_retries: usize,
}

impl HttpEncoder {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(PropstatError::Encoder("missing model name".to_string()));
        }
        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        let auth = HeaderValue::from_str(&auth)
            .map_err(|e| PropstatError::Encoder(format!("invalid api key: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| PropstatError::Encoder(format!("failed to build http client: {}", e)))?;

        Ok(HttpEncoder {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            max_retries: 3,
        })
    }

    /// Builds an encoder from PROPSTAT_EMBED_URL, PROPSTAT_EMBED_MODEL and
    /// PROPSTAT_EMBED_API_KEY. None when the endpoint or model is unset;
    /// the caller falls back to the unranked summary in that case.
    pub fn from_env() -> Option<HttpEncoder> {
        let base_url = std::env::var("PROPSTAT_EMBED_URL").ok()?;
        let model = std::env::var("PROPSTAT_EMBED_MODEL").ok()?;
        let api_key = std::env::var("PROPSTAT_EMBED_API_KEY").unwrap_or_default();
        match HttpEncoder::new(&base_url, &model, &api_key, Duration::from_secs(30)) {
            Ok(encoder) => Some(encoder),
            Err(e) => {
                warn!("Failed to build embeddings client: {}", e);
                None
            }
        }
    }

    fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }
}

impl SentenceEncoder for HttpEncoder {
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f32>>> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: sentences,
        };

        let mut attempt = 0usize;
        loop {
            let response = self.client.post(&self.endpoint).json(&request).send();
            match response {
                Ok(resp) if resp.status().is_success() => {
                    let mut parsed: EmbeddingResponse = resp.json().map_err(|e| {
                        PropstatError::Encoder(format!("malformed embedding response: {}", e))
                    })?;
                    parsed.data.sort_by_key(|entry| entry.index);
                    if parsed.data.len() != sentences.len() {
                        return Err(PropstatError::Encoder(format!(
                            "got {} embeddings for {} sentences",
                            parsed.data.len(),
                            sentences.len()
                        )));
                    }
                    debug!("Embedded {} sentences", sentences.len());
                    return Ok(parsed.data.into_iter().map(|e| e.embedding).collect());
                }
                Ok(resp) => {
                    let status = resp.status();
                    if Self::should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        thread::sleep(Duration::from_millis(250 * attempt as u64));
                        continue;
                    }
                    return Err(PropstatError::Encoder(format!(
                        "embeddings request failed with status {}",
                        status
                    )));
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        thread::sleep(Duration::from_millis(250 * attempt as u64));
                        continue;
                    }
                    return Err(PropstatError::Encoder(format!(
                        "embeddings request failed: {}",
                        e
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_model() {
        let result = HttpEncoder::new(
            "http://localhost:9999",
            " ",
            "key",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(PropstatError::Encoder(_))));
    }

    #[test]
    fn endpoint_trailing_slash_normalized() {
        let encoder = HttpEncoder::new(
            "http://localhost:9999/v1/",
            "test-model",
            "key",
            Duration::from_secs(1),
        )
        .expect("encoder");
        assert_eq!(encoder.endpoint, "http://localhost:9999/v1/embeddings");
    }
}
