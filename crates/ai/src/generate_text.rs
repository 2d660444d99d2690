use anyhow::anyhow;
use async_openai::{
  Client,
  config::OpenAIConfig,
  types::chat::{ChatCompletionRequestMessage, CreateChatCompletionRequestArgs},
};
use ragdocs_shared::{APP_ENV, AppError};

/// Chat-completion client for any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct ChatClient {
  client: Client<OpenAIConfig>,
  model: String,
  has_api_key: bool,
}

impl ChatClient {
  pub fn new(base_url: &str, api_key: Option<&str>, model: &str) -> Self {
    let mut config = OpenAIConfig::new().with_api_base(base_url.trim_end_matches('/'));
    if let Some(key) = api_key {
      config = config.with_api_key(key);
    }

    Self {
      client: Client::with_config(config),
      model: model.to_owned(),
      has_api_key: api_key.is_some(),
    }
  }

  pub fn from_env() -> Self {
    Self::new(
      &APP_ENV.openai_base_url,
      APP_ENV.openai_api_key.as_deref(),
      &APP_ENV.openai_chat_model,
    )
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  /// Send the conversation and return the text of the first choice that has any.
  pub async fn generate_text(
    &self,
    messages: Vec<ChatCompletionRequestMessage>,
  ) -> Result<String, AppError> {
    if !self.has_api_key {
      return Err(anyhow!("OPENAI_API_KEY must be set to generate answers").into());
    }

    let request = CreateChatCompletionRequestArgs::default()
      .model(&self.model)
      .messages(messages)
      .build()?;

    tracing::debug!(model = %self.model, "Requesting chat completion");

    self
      .client
      .chat()
      .create(request)
      .await
      .map(|r| r.choices.into_iter())?
      .find_map(|c| c.message.content)
      .ok_or_else(|| anyhow!("empty message content").into())
  }
}
