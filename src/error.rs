//! Errors raised while building an edition.
//!
//! Nothing here is retried: every failure is treated as deterministic and is
//! reported once, at the point where the failing operation detected it.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A required executable could not be started
    #[error("`{tool}` is not installed or not on the PATH ({hint})")]
    ToolNotFound { tool: String, hint: &'static str },

    /// The image renderer ran but exited unsuccessfully
    #[error("failed to convert {}: {tool} exited with {status}\n{output}", input.display())]
    ConversionFailed {
        tool: String,
        input: PathBuf,
        status: ExitStatus,
        output: String,
    },

    /// The document converter ran but exited unsuccessfully
    #[error("failed to build {}: {tool} exited with {status}\n{output}", artifact.display())]
    RenderFailed {
        tool: String,
        artifact: PathBuf,
        status: ExitStatus,
        output: String,
    },

    #[error("failed to read chapter {}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> BuildError {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
