// Re-export async_openai types for consumers
pub use async_openai::types::chat::{
  ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
};

mod cosine_similarity;
pub use cosine_similarity::cosine_similarity;

mod embed_shared;
pub use embed_shared::EmbeddingClient;

mod embed;

mod embed_many;

mod generate_text;
pub use generate_text::ChatClient;
