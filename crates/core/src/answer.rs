use async_trait::async_trait;
use ragdocs_ai::{ChatClient, ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs};
use ragdocs_shared::AppError;

/// Shown after a failed answer so the user knows what to check first.
pub const ANSWER_FAILURE_HINT: &str = "Check that OPENAI_API_KEY is set and valid.";

#[async_trait]
pub trait Generator {
  async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

#[async_trait]
impl Generator for ChatClient {
  async fn generate(&self, prompt: &str) -> Result<String, AppError> {
    let user = ChatCompletionRequestUserMessageArgs::default()
      .content(prompt)
      .build()?;

    self
      .generate_text(vec![ChatCompletionRequestMessage::User(user)])
      .await
  }
}

#[must_use]
pub fn build_prompt(query: &str, document: &str) -> String {
  format!(
    "Here is a document:\n<document>\n{document}\n</document>\n\n\
     Using only the document above, answer the following question. \
     If the document does not contain the answer, say so.\n\n\
     Question: {query}"
  )
}

/// Answer `query` with `document` as the only context.
pub async fn answer<G>(generator: &G, query: &str, document: &str) -> Result<String, AppError>
where
  G: Generator + ?Sized,
{
  let prompt = build_prompt(query, document);
  tracing::debug!(prompt_len = prompt.len(), "Generating answer");
  generator.generate(&prompt).await
}
