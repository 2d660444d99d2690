use std::env;
use std::sync::LazyLock;

const DEFAULT_VOYAGE_BASE_URL: &str = "https://api.voyageai.com/v1";
const DEFAULT_VOYAGE_EMBEDDING_MODEL: &str = "voyage-3.5-lite";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";

/// Provider settings read from the environment.
///
/// API keys are optional here; a client fails when it is asked to make a call
/// without one.
#[derive(Debug, Clone)]
pub struct AppEnv {
  pub voyage_api_key: Option<String>,
  pub voyage_base_url: String,
  pub voyage_embedding_model: String,
  pub openai_api_key: Option<String>,
  pub openai_base_url: String,
  pub openai_chat_model: String,
}

impl AppEnv {
  fn new() -> Self {
    Self {
      voyage_api_key: non_empty("VOYAGE_API_KEY"),
      voyage_base_url: non_empty("VOYAGE_BASE_URL")
        .unwrap_or_else(|| DEFAULT_VOYAGE_BASE_URL.to_owned()),
      voyage_embedding_model: non_empty("VOYAGE_EMBEDDING_MODEL")
        .unwrap_or_else(|| DEFAULT_VOYAGE_EMBEDDING_MODEL.to_owned()),
      openai_api_key: non_empty("OPENAI_API_KEY"),
      openai_base_url: non_empty("OPENAI_BASE_URL")
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned()),
      openai_chat_model: non_empty("OPENAI_CHAT_MODEL")
        .unwrap_or_else(|| DEFAULT_OPENAI_CHAT_MODEL.to_owned()),
    }
  }
}

fn non_empty(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// Loaded on first access, so `.env` must be applied before anything touches it.
pub static APP_ENV: LazyLock<AppEnv> = LazyLock::new(AppEnv::new);
