use ragdocs_shared::AppError;

use crate::embed_shared::{EmbeddingClient, InputType};

impl EmbeddingClient {
  /// Embed multiple documents in a single API call.
  ///
  /// Returns one vector per input, in the same order.
  pub async fn embed_many(&self, inputs: &[String]) -> Result<Vec<Vec<f64>>, AppError> {
    if inputs.is_empty() {
      return Ok(vec![]);
    }

    self.request(inputs, InputType::Document).await
  }
}
