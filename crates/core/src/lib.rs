mod answer;
pub use answer::{ANSWER_FAILURE_HINT, Generator, answer, build_prompt};

mod cache;
pub use cache::{
  CacheRecord, CacheStore, DEFAULT_CACHE_PATH, Embeddings, FileCacheStore, MemoryCacheStore,
  docs_hash,
};

mod document;
pub use document::{DEFAULT_DOCUMENTS, Documents, load_documents};

mod embeddings;
pub use embeddings::{CachedEmbeddings, EmbeddingSource, Embedder, ensure_embeddings};

mod rank;
pub use rank::{RankedDocument, format_ranking, rank};
