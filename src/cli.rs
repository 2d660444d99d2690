use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum, error::ErrorKind};
use ragdocs_core::{DEFAULT_CACHE_PATH, DEFAULT_DOCUMENTS};

#[derive(Parser, Debug)]
#[command(
  name = "ragdocs",
  version,
  about = "Rank the project READMEs against a query, or answer it from the best match",
  after_help = "Examples:\n  ragdocs                       refresh the embedding cache\n  ragdocs similarity \"query\"    rank documents\n  ragdocs rag \"query\"           rank, then answer from the top document\n  ragdocs \"query\"               same as `similarity`"
)]
pub struct Cli {
  /// `similarity` or `rag`; a lone argument is taken as a similarity query
  #[arg(value_name = "MODE_OR_QUERY")]
  pub mode_or_query: Option<String>,

  /// Query text, when a mode is given
  #[arg(value_name = "QUERY")]
  pub query: Option<String>,

  /// Embedding cache file
  #[arg(long, env = "RAGDOCS_CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
  pub cache: PathBuf,

  /// Document to embed instead of the built-in README list (repeatable)
  #[arg(long = "doc", value_name = "PATH")]
  pub docs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
  Similarity,
  Rag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Only make sure the cache is current.
  Embed,
  Query { mode: Mode, query: String },
}

impl Cli {
  /// Turn the positional arguments into a [`Command`].
  ///
  /// Errors are clap errors so they exit the same way a parse failure does.
  pub fn resolve(&self) -> Result<Command, clap::Error> {
    match (self.mode_or_query.as_deref(), self.query.as_deref()) {
      (None, _) => Ok(Command::Embed),
      (Some(single), None) => {
        if Mode::from_str(single, true).is_ok() {
          return Err(Self::usage_error(
            ErrorKind::MissingRequiredArgument,
            format!("mode '{single}' needs a query"),
          ));
        }
        Ok(Command::Query {
          mode: Mode::Similarity,
          query: non_empty_query(single)?,
        })
      }
      (Some(mode), Some(query)) => {
        let mode = Mode::from_str(mode, true).map_err(|_| {
          Self::usage_error(
            ErrorKind::InvalidValue,
            format!("invalid mode '{mode}' (expected 'similarity' or 'rag')"),
          )
        })?;
        Ok(Command::Query {
          mode,
          query: non_empty_query(query)?,
        })
      }
    }
  }

  pub fn documents(&self) -> Vec<String> {
    if self.docs.is_empty() {
      DEFAULT_DOCUMENTS.iter().map(|&p| p.to_owned()).collect()
    } else {
      self.docs.clone()
    }
  }

  fn usage_error(kind: ErrorKind, message: String) -> clap::Error {
    <Self as CommandFactory>::command().error(kind, message)
  }
}

fn non_empty_query(query: &str) -> Result<String, clap::Error> {
  if query.trim().is_empty() {
    return Err(Cli::usage_error(
      ErrorKind::InvalidValue,
      "query must not be empty".to_owned(),
    ));
  }
  Ok(query.to_owned())
}
