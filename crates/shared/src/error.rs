use std::{
  backtrace::BacktraceStatus,
  fmt::{Debug, Display},
};

/// Error type shared by every crate in the workspace.
///
/// Wraps an [`anyhow::Error`] so any error can be lifted with `?`.
pub struct AppError {
  err: anyhow::Error,
}

impl AppError {
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self { err: err.into() }
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // `{:#}` prints the whole context chain on one line
    write!(f, "{:#}", self.err)
  }
}

// `main` returns `Result<(), AppError>`, which reports errors through `Debug`.
impl Debug for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:#}", self.err)?;
    if cfg!(debug_assertions) {
      let bt = self.err.backtrace();
      if bt.status() == BacktraceStatus::Captured {
        write!(f, "\nBacktrace:\n{bt}")?;
      } else {
        write!(f, "\n(hint: set RUST_BACKTRACE=1 to enable backtrace)")?;
      }
    }
    Ok(())
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}
