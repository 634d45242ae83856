use super::{artifact_path, render_failed, Render};
use crate::config::Configuration;
use crate::error::BuildError;
use crate::tool::Tool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A reflowable e-reader package with a table of contents and cover.
#[derive(Debug)]
pub struct EPUB {
    pandoc: Tool,
    cover_image: PathBuf,
    stem: String,
}

impl EPUB {
    pub fn new(config: &Configuration) -> EPUB {
        EPUB {
            pandoc: config.tools.pandoc(),
            cover_image: config.cover_image.clone(),
            stem: config.artifact_stem.clone(),
        }
    }

    pub fn artifact(&self, out_dir: &Path, language: &str) -> PathBuf {
        artifact_path(out_dir, &self.stem, language, "epub")
    }

    fn arguments(&self, markdown: &Path, artifact: &Path) -> Vec<OsString> {
        let mut cover = OsString::from("--epub-cover-image=");
        cover.push(&self.cover_image);
        vec![
            markdown.into(),
            "--toc".into(),
            "-o".into(),
            artifact.into(),
            cover,
        ]
    }
}

impl Render for EPUB {
    fn render(
        &self,
        markdown: &Path,
        language: &str,
        out_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        let artifact = self.artifact(out_dir, language);
        log::info!("{language}: building {}", artifact.display());
        self.pandoc.run(
            self.arguments(markdown, &artifact),
            render_failed(self.pandoc.program(), &artifact),
        )?;
        Ok(artifact)
    }
}
