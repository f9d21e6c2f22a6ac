//! Ollama embedding backend.

use super::{EmbedError, Embedder, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generates embeddings through an Ollama-compatible HTTP API.
///
/// Common embedding models:
/// - `nomic-embed-text` - 768-dimensional embeddings, good general purpose
/// - `mxbai-embed-large` - 1024-dimensional embeddings, higher quality
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimension: usize,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embed", self.base_url)
    }

    fn first_embedding(&self, response: EmbedResponse) -> Result<Vec<f32>> {
        let embedding = response
            .embeddings
            .into_iter()
            .next()
            .ok_or(EmbedError::NoEmbeddings)?;

        if embedding.len() != self.dimension {
            return Err(EmbedError::UnexpectedDimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.model,
            input: text,
        };

        debug!(model = %self.model, chars = text.len(), "Requesting embedding");
        let response = self
            .http_client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(EmbedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbedResponse = response.json().await?;
        self.first_embedding(body)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let embedder = OllamaEmbedder::new("http://localhost:11434/", "nomic-embed-text", 768);
        assert_eq!(embedder.endpoint(), "http://localhost:11434/api/embed");
    }

    #[test]
    fn test_request_shape() {
        let request = EmbedRequest {
            model: "nomic-embed-text",
            input: "progress note",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "model": "nomic-embed-text", "input": "progress note" })
        );
    }

    #[test]
    fn test_first_embedding() {
        let embedder = OllamaEmbedder::new("http://localhost:11434", "m", 3);

        let body: EmbedResponse =
            serde_json::from_str(r#"{"model":"m","embeddings":[[0.1,0.2,0.3]]}"#).unwrap();
        assert_eq!(embedder.first_embedding(body).unwrap(), vec![0.1, 0.2, 0.3]);

        let body: EmbedResponse = serde_json::from_str(r#"{"model":"m"}"#).unwrap();
        assert!(matches!(
            embedder.first_embedding(body),
            Err(EmbedError::NoEmbeddings)
        ));

        let body: EmbedResponse = serde_json::from_str(r#"{"embeddings":[[0.1]]}"#).unwrap();
        assert!(matches!(
            embedder.first_embedding(body),
            Err(EmbedError::UnexpectedDimension { expected: 3, actual: 1 })
        ));
    }
}
