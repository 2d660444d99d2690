use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, anyhow};
use ragdocs_shared::AppError;

/// The READMEs embedded when no `--doc` is given, relative to the working directory.
pub const DEFAULT_DOCUMENTS: [&str; 4] = [
  "java/README.md",
  "node/README.md",
  "ruby/README.md",
  "./README.md",
];

/// A loaded document set keyed by the path string it was loaded from.
///
/// Keys are kept verbatim (`./README.md` stays `./README.md`) because they
/// feed the document set hash and the cache file.
pub type Documents = BTreeMap<String, String>;

/// Read every path into memory.
///
/// Any unreadable file aborts the whole load; no partial set is returned.
pub fn load_documents<P: AsRef<str>>(paths: &[P]) -> Result<Documents, AppError> {
  if paths.is_empty() {
    return Err(anyhow!("no documents to load").into());
  }

  paths
    .iter()
    .map(|path| -> Result<(String, String), AppError> {
      let path = path.as_ref();
      let content = fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read document {path}"))?;
      Ok((path.to_owned(), normalize_newlines(content)))
    })
    .collect()
}

/// Fold `\r\n` and lone `\r` into `\n`, the way text-mode reads did when
/// existing caches were hashed.
fn normalize_newlines(content: String) -> String {
  if !content.contains('\r') {
    return content;
  }
  content.replace("\r\n", "\n").replace('\r', "\n")
}
