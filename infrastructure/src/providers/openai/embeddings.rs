//! Embedding client used to build and query the semantic index

use super::types::{EmbeddingRequest, EmbeddingResponse, error_message};
use super::{ApiKey, endpoint_url};
use crate::config::FileConfig;
use async_trait::async_trait;
use gnsearch_application::{Embedder, EmbeddingError};
use std::time::Duration;
use tracing::debug;

/// [`Embedder`] over an OpenAI-compatible `/embeddings` endpoint.
///
/// Inputs are sent in batches of `batch_size`; vectors come back in input
/// order regardless of how the server orders them.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<ApiKey>,
    batch_size: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &FileConfig) -> Result<Self, EmbeddingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_seconds))
            .build()
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.embedding_endpoint().to_string(),
            model: config.embedding.model.clone(),
            api_key: ApiKey::new(config.embedding_api_key()),
            batch_size: config.embedding.batch_size.max(1),
        })
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut builder = self
            .http
            .post(endpoint_url(&self.base_url, "embeddings"))
            .json(&EmbeddingRequest {
                model: &self.model,
                input: batch,
            });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&text)
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        if parsed.data.len() != batch.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} vectors, got {}",
                batch.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for (n, batch) in texts.chunks(self.batch_size).enumerate() {
            debug!(batch = n, size = batch.len(), model = %self.model, "Embedding batch");
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
