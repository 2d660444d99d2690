use anyhow::anyhow;
use ragdocs_shared::AppError;

use crate::embed_shared::{EmbeddingClient, InputType};

impl EmbeddingClient {
  /// Embed a single search query.
  pub async fn embed(&self, input: &str) -> Result<Vec<f64>, AppError> {
    self
      .request(&[input.to_owned()], InputType::Query)
      .await?
      .pop()
      .ok_or_else(|| anyhow!("empty embedding").into())
  }
}
