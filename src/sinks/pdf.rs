use super::{artifact_path, render_failed, Render};
use crate::config::{Configuration, Geometry};
use crate::error::BuildError;
use crate::tool::Tool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A paginated book: pandoc to LaTeX, typeset by XeLaTeX.
#[derive(Debug)]
pub struct PDF {
    pandoc: Tool,
    xelatex: Tool,
    listings_header: PathBuf,
    geometry: Geometry,
    stem: String,
}

impl PDF {
    pub fn new(config: &Configuration) -> PDF {
        PDF {
            pandoc: config.tools.pandoc(),
            xelatex: config.tools.xelatex(),
            listings_header: config.listings_header.clone(),
            geometry: config.geometry.clone(),
            stem: config.artifact_stem.clone(),
        }
    }

    pub fn artifact(&self, out_dir: &Path, language: &str) -> PathBuf {
        artifact_path(out_dir, &self.stem, language, "pdf")
    }

    fn arguments(&self, markdown: &Path, artifact: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            markdown.into(),
            "-V".into(),
            "documentclass=report".into(),
        ];
        for (side, length) in self.geometry.sides() {
            args.push("-V".into());
            args.push(format!("geometry:{side}={length}").into());
        }
        args.extend(
            [
                "-t",
                "latex",
                "-s",
                "--toc",
                "--listings",
                "-H",
            ]
            .map(OsString::from),
        );
        args.push(self.listings_header.clone().into());
        args.push("-o".into());
        args.push(artifact.into());
        args.push(format!("--pdf-engine={}", self.xelatex.program()).into());
        args
    }
}

impl Render for PDF {
    fn render(
        &self,
        markdown: &Path,
        language: &str,
        out_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        self.xelatex.probe()?;

        let artifact = self.artifact(out_dir, language);
        log::info!("{language}: building {}", artifact.display());
        self.pandoc.run(
            self.arguments(markdown, &artifact),
            render_failed(self.pandoc.program(), &artifact),
        )?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_build_pandoc_arguments() {
        let mut config = Configuration::default();
        config.geometry.left = "3cm".to_string();
        let pdf = PDF::new(&config);

        let artifact = pdf.artifact(Path::new("ebook"), "en");
        assert_eq!(artifact, PathBuf::from("ebook/vulkan_tutorial_en.pdf"));

        let args: Vec<String> = pdf
            .arguments(Path::new("/tmp/en.md"), &artifact)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/tmp/en.md",
                "-V",
                "documentclass=report",
                "-V",
                "geometry:left=3cm",
                "-V",
                "geometry:right=2.5cm",
                "-V",
                "geometry:top=2.5cm",
                "-V",
                "geometry:bottom=2.5cm",
                "-t",
                "latex",
                "-s",
                "--toc",
                "--listings",
                "-H",
                "ebook/listings-setup.tex",
                "-o",
                "ebook/vulkan_tutorial_en.pdf",
                "--pdf-engine=xelatex",
            ]
        );
    }

    #[test]
    fn missing_typesetter_stops_the_build() {
        let mut config = Configuration::default();
        config.tools.xelatex = "vk-ebook-no-such-xelatex".to_string();
        config.tools.pandoc = "vk-ebook-no-such-pandoc".to_string();
        let pdf = PDF::new(&config);

        let err = pdf.render(Path::new("en.md"), "en", Path::new("ebook")).unwrap_err();
        assert!(
            matches!(err, BuildError::ToolNotFound { ref tool, .. } if tool == "vk-ebook-no-such-xelatex")
        );
    }
}
