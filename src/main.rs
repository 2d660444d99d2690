use std::io;

use clap::Parser;
use ragdocs_ai::{ChatClient, EmbeddingClient};
use ragdocs_core::{FileCacheStore, load_documents};
use ragdocs_shared::AppError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod cli;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
  // `.env` must be applied before anything reads `APP_ENV` or `RUST_LOG`
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
          "{}=info,ragdocs_core=info,ragdocs_ai=info",
          env!("CARGO_CRATE_NAME")
        )
        .into()
      }),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  let cli = Cli::parse();
  let command = cli.resolve().unwrap_or_else(|err| err.exit());

  let documents = load_documents(&cli.documents())?;
  let store = FileCacheStore::new(&cli.cache);
  let embedder = EmbeddingClient::from_env();
  let generator = ChatClient::from_env();

  tracing::debug!(
    documents = documents.len(),
    cache = %store.path().display(),
    embedding_model = embedder.model(),
    chat_model = generator.model(),
    "Starting"
  );

  let mut stdout = io::stdout().lock();
  app::run(
    &command,
    &documents,
    &store,
    &embedder,
    &generator,
    &mut stdout,
  )
  .await
}
