//! Output formats.
//!
//! Both books are produced by pandoc from the same assembled Markdown; the sinks
//! only differ in the arguments they pass and the tools they need. Sinks write
//! into whatever directory they are given; publishing to the output directory is
//! up to the caller.

use crate::error::BuildError;
use std::path::{Path, PathBuf};

mod pdf;
pub use pdf::*;

mod epub;
pub use epub::*;

#[derive(Debug)]
pub enum Sink {
    PDF(PDF),
    EPUB(EPUB),
}

pub trait Render {
    /// Render `markdown` into this sink's artifact for `language`, inside `out_dir`.
    fn render(&self, markdown: &Path, language: &str, out_dir: &Path)
        -> Result<PathBuf, BuildError>;
}

impl Render for Sink {
    fn render(
        &self,
        markdown: &Path,
        language: &str,
        out_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        match self {
            Sink::PDF(p) => p.render(markdown, language, out_dir),
            Sink::EPUB(e) => e.render(markdown, language, out_dir),
        }
    }
}

impl Sink {
    pub fn name(&self) -> &'static str {
        match self {
            Sink::PDF(_) => "pdf",
            Sink::EPUB(_) => "epub",
        }
    }
}

/// The artifact path for `language`: `<out_dir>/<stem>_<language>.<extension>`.
pub(crate) fn artifact_path(
    out_dir: &Path,
    stem: &str,
    language: &str,
    extension: &str,
) -> PathBuf {
    out_dir.join(format!("{stem}_{language}.{extension}"))
}

fn render_failed(
    tool: &str,
    artifact: &Path,
) -> impl FnOnce(std::process::ExitStatus, String) -> BuildError {
    let tool = tool.to_string();
    let artifact = artifact.to_path_buf();
    move |status, output| BuildError::RenderFailed {
        tool,
        artifact,
        status,
        output,
    }
}
