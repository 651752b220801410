//! Error types for DAL entry points.

use thiserror::Error;

/// Errors surfaced by [`crate::run`] and its building blocks.
///
/// Collaborator failures (DAL construction, demo, interactive host) are wrapped
/// transparently: their message and source chain reach the process boundary
/// unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DalError {
    /// Command-line arguments could not be parsed (or `--help`/`--version` was requested).
    #[error(transparent)]
    Args(#[from] clap::Error),

    /// Non-interactive run without a demo to execute.
    #[error("no demo supplied: pass a demo to the runner or use --interactive")]
    MissingDemo,

    /// The DAL factory failed to build an instance from the resolved sources.
    #[error(transparent)]
    Construction(anyhow::Error),

    /// The demo failed.
    #[error(transparent)]
    Demo(anyhow::Error),

    /// The interactive session failed.
    #[error(transparent)]
    Session(anyhow::Error),

    /// Writing the DAL rendering failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl DalError {
    /// Process exit status for this error.
    ///
    /// Argument errors use clap's own convention (0 for `--help`, 2 for usage
    /// errors); everything else is a plain failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Args(e) => e.exit_code(),
            _ => 1,
        }
    }
}
