use std::io::Write;

use anyhow::anyhow;
use ragdocs_core::{
  ANSWER_FAILURE_HINT, CacheStore, Documents, Embedder, Generator, answer, ensure_embeddings,
  format_ranking, rank,
};
use ragdocs_shared::AppError;

use crate::cli::{Command, Mode};

/// Run one invocation: make sure the cache is current, then rank and
/// optionally answer.
///
/// A failed answer is reported on `out` and does not fail the run.
pub async fn run<S, E, G, W>(
  command: &Command,
  documents: &Documents,
  store: &S,
  embedder: &E,
  generator: &G,
  out: &mut W,
) -> Result<(), AppError>
where
  S: CacheStore + ?Sized,
  E: Embedder + ?Sized,
  G: Generator + ?Sized,
  W: Write + ?Sized,
{
  let cached = ensure_embeddings(documents, store, embedder).await?;

  let (mode, query) = match command {
    Command::Embed => {
      writeln!(
        out,
        "Loaded embeddings for {} documents",
        cached.embeddings.len()
      )?;
      return Ok(());
    }
    Command::Query { mode, query } => (*mode, query.as_str()),
  };

  let query_vector = embedder.embed_query(query).await?;
  let ranked = rank(&query_vector, &cached.embeddings);
  writeln!(out, "{}", format_ranking(&ranked))?;

  if mode == Mode::Similarity {
    return Ok(());
  }

  let top = ranked
    .first()
    .ok_or_else(|| anyhow!("no documents to answer from"))?;
  let context = documents
    .get(&top.path)
    .ok_or_else(|| anyhow!("ranked document {} is not loaded", top.path))?;

  tracing::info!(path = %top.path, score = top.score, "Answering from top document");

  match answer(generator, query, context).await {
    Ok(reply) => {
      writeln!(out, "\n--- Answer (context: {}) ---\n{reply}", top.path)?;
    }
    Err(err) => {
      tracing::error!(error = %err, "Answer generation failed");
      writeln!(out, "\nError generating answer: {err}\n{ANSWER_FAILURE_HINT}")?;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use async_trait::async_trait;
  use pretty_assertions::assert_eq;
  use ragdocs_core::{CacheRecord, MemoryCacheStore, docs_hash};

  use super::*;

  /// Vectors keyed on the document text, so rankings are predictable.
  #[derive(Default)]
  struct TableEmbedder {
    document_calls: AtomicUsize,
    query_calls: AtomicUsize,
  }

  fn vector_for(text: &str) -> Vec<f64> {
    match text {
      "java" => vec![1.0, 0.0],
      "node" => vec![0.0, 1.0],
      "ruby" => vec![1.0, 1.0],
      _ => vec![1.0, 0.0],
    }
  }

  #[async_trait]
  impl Embedder for TableEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, AppError> {
      self.document_calls.fetch_add(1, Ordering::SeqCst);
      Ok(texts.iter().map(|t| vector_for(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f64>, AppError> {
      self.query_calls.fetch_add(1, Ordering::SeqCst);
      Ok(vector_for(text))
    }
  }

  struct CannedGenerator(Result<&'static str, &'static str>);

  #[async_trait]
  impl Generator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
      assert!(prompt.contains("<document>\njava\n</document>"));
      self
        .0
        .map(str::to_owned)
        .map_err(|e| anyhow!(e.to_owned()).into())
    }
  }

  fn documents() -> Documents {
    BTreeMap::from([
      ("java/README.md".to_owned(), "java".to_owned()),
      ("node/README.md".to_owned(), "node".to_owned()),
      ("ruby/README.md".to_owned(), "ruby".to_owned()),
    ])
  }

  fn query(mode: Mode, text: &str) -> Command {
    Command::Query {
      mode,
      query: text.to_owned(),
    }
  }

  async fn run_to_string(
    command: &Command,
    store: &MemoryCacheStore,
    embedder: &TableEmbedder,
    generator: &CannedGenerator,
  ) -> Result<String, AppError> {
    let mut out = Vec::new();
    run(command, &documents(), store, embedder, generator, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
  }

  #[tokio::test]
  async fn embed_only_reports_document_count() {
    let store = MemoryCacheStore::new();
    let embedder = TableEmbedder::default();

    let out = run_to_string(&Command::Embed, &store, &embedder, &CannedGenerator(Ok("")))
      .await
      .unwrap();

    assert_eq!(out, "Loaded embeddings for 3 documents\n");
    assert_eq!(embedder.query_calls.load(Ordering::SeqCst), 0);
    assert!(store.record().is_some());
  }

  #[tokio::test]
  async fn similarity_prints_ranking() {
    let store = MemoryCacheStore::new();
    let embedder = TableEmbedder::default();

    let out = run_to_string(
      &query(Mode::Similarity, "java"),
      &store,
      &embedder,
      &CannedGenerator(Err("must not be called")),
    )
    .await
    .unwrap();

    assert_eq!(
      out,
      "--- Ranking ---\n1.0000  java/README.md\n0.7071  ruby/README.md\n0.0000  node/README.md\n"
    );
  }

  #[tokio::test]
  async fn cached_record_skips_document_embedding() {
    let docs = documents();
    let store = MemoryCacheStore::with_record(CacheRecord {
      docs_hash: docs_hash(&docs),
      embeddings: BTreeMap::from([
        ("java/README.md".to_owned(), vec![0.0, 1.0]),
        ("node/README.md".to_owned(), vec![1.0, 0.0]),
        ("ruby/README.md".to_owned(), vec![-1.0, 0.0]),
      ]),
    });
    let embedder = TableEmbedder::default();

    let out = run_to_string(
      &query(Mode::Similarity, "java"),
      &store,
      &embedder,
      &CannedGenerator(Ok("")),
    )
    .await
    .unwrap();

    assert_eq!(embedder.document_calls.load(Ordering::SeqCst), 0);
    assert!(out.starts_with("--- Ranking ---\n1.0000  node/README.md\n"));
  }

  #[tokio::test]
  async fn rag_answers_from_top_document() {
    let store = MemoryCacheStore::new();
    let embedder = TableEmbedder::default();

    let out = run_to_string(
      &query(Mode::Rag, "java"),
      &store,
      &embedder,
      &CannedGenerator(Ok("Run `mvn test`.")),
    )
    .await
    .unwrap();

    assert!(out.ends_with("\n--- Answer (context: java/README.md) ---\nRun `mvn test`.\n"));
  }

  #[tokio::test]
  async fn rag_generation_failure_is_reported_not_raised() {
    let store = MemoryCacheStore::new();
    let embedder = TableEmbedder::default();

    let out = run_to_string(
      &query(Mode::Rag, "java"),
      &store,
      &embedder,
      &CannedGenerator(Err("401 invalid api key")),
    )
    .await
    .unwrap();

    assert!(out.contains("Error generating answer: 401 invalid api key\n"));
    assert!(out.ends_with(&format!("{ANSWER_FAILURE_HINT}\n")));
  }
}
