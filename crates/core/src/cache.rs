use std::{
  collections::BTreeMap,
  fs,
  io::{ErrorKind, Write},
  path::{Path, PathBuf},
  sync::Mutex,
};

use anyhow::{Context, anyhow};
use md5::{Digest, Md5};
use ragdocs_shared::AppError;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::document::Documents;

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "embeddings_cache.json";

/// Embedding vectors keyed by document path.
pub type Embeddings = BTreeMap<String, Vec<f64>>;

/// The persisted cache file.
///
/// Field names are part of the on-disk format shared with earlier versions
/// of the tool and must not change. Vectors are kept as `f64` so values
/// written by those versions load and save back without losing digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
  pub docs_hash: String,
  pub embeddings: Embeddings,
}

impl CacheRecord {
  /// A record is reusable only for the exact document set it was built from.
  #[must_use]
  pub fn is_valid_for(&self, docs_hash: &str, documents: &Documents) -> bool {
    self.docs_hash == docs_hash
      && self.embeddings.len() == documents.len()
      && documents.keys().all(|path| self.embeddings.contains_key(path))
  }
}

/// Hex MD5 over every `(path, content)` pair in path order.
///
/// Path and content bytes are fed back to back with no separator, which is
/// what existing cache files were hashed with.
#[must_use]
pub fn docs_hash(documents: &Documents) -> String {
  let mut hasher = Md5::new();
  for (path, content) in documents {
    hasher.update(path.as_bytes());
    hasher.update(content.as_bytes());
  }
  hex::encode(hasher.finalize())
}

/// Somewhere a [`CacheRecord`] can be kept between runs.
pub trait CacheStore {
  /// `Ok(None)` when nothing has been stored yet.
  fn load(&self) -> Result<Option<CacheRecord>, AppError>;

  /// Replace whatever was stored with `record`.
  fn save(&self, record: &CacheRecord) -> Result<(), AppError>;
}

// ──────────────────────────────────────────────────
// JSON file
// ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FileCacheStore {
  path: PathBuf,
}

impl FileCacheStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl CacheStore for FileCacheStore {
  fn load(&self) -> Result<Option<CacheRecord>, AppError> {
    let raw = match fs::read(&self.path) {
      Ok(raw) => raw,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
      Err(err) => {
        return Err(
          anyhow!(err)
            .context(format!("failed to read cache {}", self.path.display()))
            .into(),
        );
      }
    };

    let record = serde_json::from_slice(&raw)
      .with_context(|| format!("failed to parse cache {}", self.path.display()))?;

    tracing::info!(path = %self.path.display(), "Embeddings loaded from disk");
    Ok(Some(record))
  }

  fn save(&self, record: &CacheRecord) -> Result<(), AppError> {
    // Write next to the target and rename over it so readers never see a
    // half-written file.
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
      .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    let body = serde_json::to_vec(record)?;
    tmp.write_all(&body)?;
    tmp.as_file().sync_all()?;
    tmp
      .persist(&self.path)
      .with_context(|| format!("failed to replace cache {}", self.path.display()))?;

    tracing::info!(path = %self.path.display(), "Embeddings saved to disk");
    Ok(())
  }
}

// ──────────────────────────────────────────────────
// In memory
// ──────────────────────────────────────────────────

/// Process-local store, used where no cache file should be touched.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
  record: Mutex<Option<CacheRecord>>,
}

impl MemoryCacheStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_record(record: CacheRecord) -> Self {
    Self {
      record: Mutex::new(Some(record)),
    }
  }

  pub fn record(&self) -> Option<CacheRecord> {
    self
      .record
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner)
      .clone()
  }
}

impl CacheStore for MemoryCacheStore {
  fn load(&self) -> Result<Option<CacheRecord>, AppError> {
    Ok(self.record())
  }

  fn save(&self, record: &CacheRecord) -> Result<(), AppError> {
    *self
      .record
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(record.clone());
    Ok(())
  }
}
