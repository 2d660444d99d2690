use std::fmt::Write;

use ragdocs_ai::cosine_similarity;

use crate::cache::Embeddings;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocument {
  pub path: String,
  pub score: f64,
}

/// Score every document against `query`, best first.
///
/// Equal scores are ordered by path so output is reproducible.
#[must_use]
pub fn rank(query: &[f64], embeddings: &Embeddings) -> Vec<RankedDocument> {
  let mut ranked: Vec<RankedDocument> = embeddings
    .iter()
    .map(|(path, vector)| {
      if vector.len() != query.len() {
        tracing::warn!(
          path,
          document = vector.len(),
          query = query.len(),
          "Embedding dimensions differ, scoring as 0"
        );
      }
      RankedDocument {
        path: path.clone(),
        score: cosine_similarity(query, vector),
      }
    })
    .collect();

  ranked.sort_by(|a, b| {
    b.score
      .total_cmp(&a.score)
      .then_with(|| a.path.cmp(&b.path))
  });

  ranked
}

#[must_use]
pub fn format_ranking(ranked: &[RankedDocument]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "--- Ranking ---");
  for doc in ranked {
    let _ = writeln!(out, "{:.4}  {}", doc.score, doc.path);
  }
  out.trim_end().to_string()
}
