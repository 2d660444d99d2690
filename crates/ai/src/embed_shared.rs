use anyhow::{Context, anyhow};
use ragdocs_shared::{APP_ENV, AppError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// How the provider should encode the input.
///
/// Documents and queries are embedded asymmetrically, so the two must never
/// be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
  Document,
  Query,
}

/// Client for a Voyage-style `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
  http: Client,
  base_url: String,
  api_key: Option<String>,
  model: String,
}

impl EmbeddingClient {
  pub fn new(base_url: &str, api_key: Option<String>, model: &str) -> Self {
    Self {
      http: Client::new(),
      base_url: base_url.trim_end_matches('/').to_owned(),
      api_key,
      model: model.to_owned(),
    }
  }

  pub fn from_env() -> Self {
    Self::new(
      &APP_ENV.voyage_base_url,
      APP_ENV.voyage_api_key.clone(),
      &APP_ENV.voyage_embedding_model,
    )
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  /// Issue one embeddings call and return the vectors in input order.
  ///
  /// The response is re-sorted by its `index` field and checked against the
  /// input count, so a reordered or short response cannot be mis-paired.
  pub(crate) async fn request(
    &self,
    inputs: &[String],
    input_type: InputType,
  ) -> Result<Vec<Vec<f64>>, AppError> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or_else(|| anyhow!("VOYAGE_API_KEY must be set to create embeddings"))?;

    let endpoint = format!("{}/embeddings", self.base_url);
    let body = EmbeddingRequest {
      input: inputs,
      model: &self.model,
      input_type,
    };

    tracing::debug!(
      model = %self.model,
      ?input_type,
      inputs = inputs.len(),
      "Requesting embeddings"
    );

    let resp = self
      .http
      .post(&endpoint)
      .bearer_auth(api_key)
      .json(&body)
      .send()
      .await
      .with_context(|| format!("failed to call embedding provider at {endpoint}"))?;

    if !resp.status().is_success() {
      let status = resp.status();
      let text = resp
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());
      return Err(anyhow!("embedding provider returned {status}: {text}").into());
    }

    let mut parsed: EmbeddingResponse = resp
      .json()
      .await
      .context("failed to parse embedding response")?;

    parsed.data.sort_by_key(|e| e.index);

    if parsed.data.len() != inputs.len() {
      return Err(
        anyhow!(
          "embedding count mismatch: expected {}, got {}",
          inputs.len(),
          parsed.data.len()
        )
        .into(),
      );
    }

    if let Some((pos, e)) = parsed
      .data
      .iter()
      .enumerate()
      .find(|(pos, e)| e.index != *pos)
    {
      return Err(anyhow!("embedding response has index {} at position {pos}", e.index).into());
    }

    Ok(parsed.data.into_iter().map(|e| e.embedding).collect())
  }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  input: &'a [String],
  model: &'a str,
  input_type: InputType,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
  embedding: Vec<f64>,
  index: usize,
}
