//! Building every language edition.
//!
//! Images are converted once up front since they are shared by all editions;
//! after that each edition is collected, assembled and rendered on its own. A
//! failing edition is logged and skipped unless `fail_fast` is set. Books are
//! rendered into a staging directory and only copied to the output directory
//! once both formats of an edition succeeded, so a failed edition leaves
//! nothing behind. Every intermediate file lives in a temporary directory that
//! is removed when the build returns, however it returns.

use crate::assemble::Assembler;
use crate::chapters::{collect_chapters, Chapter};
use crate::config::Configuration;
use crate::images::convert_images;
use crate::sinks::{Render, Sink, EPUB, PDF};
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// What a build produced.
#[derive(Debug, Default)]
pub struct Report {
    pub artifacts: Vec<PathBuf>,
    /// Editions that failed, with the reason
    pub failures: Vec<(String, anyhow::Error)>,
}

/// Pick the editions to build: everything configured, or the requested subset.
pub fn select_languages(configured: Vec<String>, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(configured);
    }

    let mut selected = Vec::with_capacity(requested.len());
    for language in requested {
        if !configured.contains(language) {
            return Err(anyhow!(
                "Language '{language}' isn't configured (available: {})",
                configured.join("/")
            ));
        }
        if !selected.contains(language) {
            selected.push(language.clone());
        }
    }
    Ok(selected)
}

/// The chapters of one edition, in book order.
pub fn chapters(config: &Configuration, language: &str) -> Result<Vec<Chapter>> {
    let root = config.source_root.join(language);
    collect_chapters(&root, &config.privacy_prefix)
        .with_context(|| format!("Failed to collect chapters for '{language}'"))
}

pub fn build(
    config: &Configuration,
    languages: &[String],
    fail_fast: bool,
    progress: &ProgressBar,
) -> Result<Report> {
    let work_dir = tempfile::Builder::new()
        .prefix("vk-ebook-")
        .tempdir()
        .with_context(|| "Failed to create temporary directory")?;

    log::info!("converting svg images to png...");
    let raster_dir = work_dir.path().join("converted_images");
    let rendered = convert_images(&config.tools.inkscape(), &config.images_dir, &raster_dir)
        .with_context(|| "Failed to convert images")?;
    log::info!("converted {} image(s)", rendered.len());

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let assembler = Assembler {
        title: &config.title,
        author: &config.author,
        date: chrono::Local::now().format("%B %Y").to_string(),
        raster_dir: &raster_dir,
        base_url: &config.base_url,
        site_prefixes: &config.site_prefixes,
    };
    let sinks = [Sink::PDF(PDF::new(config)), Sink::EPUB(EPUB::new(config))];

    log::info!("building ebooks for languages {}", languages.join("/"));
    let mut report = Report::default();
    for language in languages {
        progress.set_message(format!("Building '{language}'..."));
        match build_edition(config, &assembler, &sinks, language, work_dir.path()) {
            Ok(artifacts) => report.artifacts.extend(artifacts),
            Err(e) if fail_fast => {
                return Err(e.context(format!("Failed to build the '{language}' edition")));
            }
            Err(e) => {
                log::error!("{language}: {e:#}");
                report.failures.push((language.clone(), e));
            }
        }
        progress.inc(1);
    }

    work_dir
        .close()
        .with_context(|| "Failed to remove temporary directory")?;
    Ok(report)
}

fn build_edition(
    config: &Configuration,
    assembler: &Assembler<'_>,
    sinks: &[Sink],
    language: &str,
    work_dir: &Path,
) -> Result<Vec<PathBuf>> {
    log::info!("{language}: generating markdown...");
    let chapters = chapters(config, language)?;
    log::debug!("{language}: {} chapter(s)", chapters.len());

    let staging = work_dir.join(format!("{language}-edition"));
    std::fs::create_dir_all(&staging)
        .with_context(|| format!("Failed to create {}", staging.display()))?;

    let published = render_and_publish(
        assembler,
        &chapters,
        sinks,
        language,
        &staging,
        &config.output_dir,
    );

    if let Err(e) = std::fs::remove_dir_all(&staging) {
        log::warn!("failed to remove {}: {e}", staging.display());
    }

    published
}

/// Render every sink into `staging`, then copy the books to `output_dir` only
/// once all of them succeeded.
fn render_and_publish(
    assembler: &Assembler<'_>,
    chapters: &[Chapter],
    sinks: &[Sink],
    language: &str,
    staging: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let markdown = staging.join(format!("{language}.md"));
    std::fs::write(&markdown, assembler.assemble(chapters))
        .with_context(|| format!("Failed to write {}", markdown.display()))?;

    let rendered = sinks
        .iter()
        .map(|sink| {
            sink.render(&markdown, language, staging)
                .with_context(|| format!("Failed to build the {} book", sink.name()))
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    rendered
        .iter()
        .map(|book| -> Result<PathBuf> {
            let name = book
                .file_name()
                .ok_or_else(|| anyhow!("Rendered book {} has no file name", book.display()))?;
            let dest = output_dir.join(name);
            std::fs::copy(book, &dest).with_context(|| {
                format!("Failed to copy {} to {}", book.display(), dest.display())
            })?;
            Ok(dest)
        })
        .collect()
}
