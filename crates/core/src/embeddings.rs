use anyhow::anyhow;
use async_trait::async_trait;
use ragdocs_ai::EmbeddingClient;
use ragdocs_shared::AppError;

use crate::cache::{CacheRecord, CacheStore, Embeddings, docs_hash};
use crate::document::Documents;

/// Turns text into vectors, keeping the document/query distinction.
#[async_trait]
pub trait Embedder {
  /// One vector per text, in input order.
  async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, AppError>;

  async fn embed_query(&self, text: &str) -> Result<Vec<f64>, AppError>;
}

#[async_trait]
impl Embedder for EmbeddingClient {
  async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, AppError> {
    self.embed_many(texts).await
  }

  async fn embed_query(&self, text: &str) -> Result<Vec<f64>, AppError> {
    self.embed(text).await
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingSource {
  Cache,
  Provider,
}

#[derive(Debug, Clone)]
pub struct CachedEmbeddings {
  pub embeddings: Embeddings,
  pub source: EmbeddingSource,
}

/// Return embeddings for `documents`, from `store` when it holds a record for
/// this exact document set, otherwise from `embedder`.
///
/// A stale or missing record is never patched: every document is embedded
/// again and the whole record is written back.
pub async fn ensure_embeddings<S, E>(
  documents: &Documents,
  store: &S,
  embedder: &E,
) -> Result<CachedEmbeddings, AppError>
where
  S: CacheStore + ?Sized,
  E: Embedder + ?Sized,
{
  let hash = docs_hash(documents);

  match store.load()? {
    Some(record) if record.is_valid_for(&hash, documents) => {
      tracing::info!(docs_hash = %hash, "Using cached embeddings");
      return Ok(CachedEmbeddings {
        embeddings: record.embeddings,
        source: EmbeddingSource::Cache,
      });
    }
    Some(record) => {
      tracing::info!(
        cached = %record.docs_hash,
        current = %hash,
        "Cached embeddings are stale"
      );
    }
    None => {}
  }

  tracing::info!(documents = documents.len(), "Generating new embeddings");

  let texts: Vec<String> = documents.values().cloned().collect();
  let vectors = embedder.embed_documents(&texts).await?;

  if vectors.len() != documents.len() {
    return Err(
      anyhow!(
        "embedder returned {} vectors for {} documents",
        vectors.len(),
        documents.len()
      )
      .into(),
    );
  }

  // `texts` was built from `documents.values()`, so keys line up by position.
  let embeddings: Embeddings = documents.keys().cloned().zip(vectors).collect();
  for (path, vector) in &embeddings {
    tracing::debug!(path, dimensions = vector.len(), "Embedded document");
  }

  let record = CacheRecord {
    docs_hash: hash,
    embeddings,
  };
  store.save(&record)?;

  Ok(CachedEmbeddings {
    embeddings: record.embeddings,
    source: EmbeddingSource::Provider,
  })
}
