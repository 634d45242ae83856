//! Image preprocessing.
//!
//! LaTeX can't embed SVG directly, so every vector image is rasterised with
//! Inkscape before either book is built. Everything else in the images
//! directory is copied through unchanged so that all references can point at a
//! single directory.

use crate::error::BuildError;
use crate::tool::Tool;
use std::path::{Path, PathBuf};

pub const VECTOR_EXTENSION: &str = "svg";
pub const RASTER_EXTENSION: &str = "png";

fn is_vector(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(VECTOR_EXTENSION))
        .unwrap_or(false)
}

/// Fill `output_dir` with raster versions of everything in `input_dir`.
///
/// Returns the paths of the rasters that were rendered (copied files are not
/// included). The input directory is never modified.
pub fn convert_images(
    inkscape: &Tool,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
    std::fs::create_dir_all(output_dir).map_err(BuildError::io(output_dir))?;

    if !input_dir.is_dir() {
        log::warn!(
            "image directory {} doesn't exist, no images will be converted",
            input_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut entries = std::fs::read_dir(input_dir)
        .map_err(BuildError::io(input_dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
        .map_err(BuildError::io(input_dir))?;
    entries.sort();

    let mut rendered = Vec::new();
    for source in entries.into_iter().filter(|p| p.is_file()) {
        let Some(name) = source.file_name() else {
            continue;
        };

        if is_vector(&source) {
            let dest = output_dir.join(name).with_extension(RASTER_EXTENSION);
            log::debug!("rasterising {} -> {}", source.display(), dest.display());
            inkscape.run(
                [
                    format!("--export-filename={}", dest.display()),
                    source.display().to_string(),
                ],
                |status, output| BuildError::ConversionFailed {
                    tool: inkscape.program().to_string(),
                    input: source.clone(),
                    status,
                    output,
                },
            )?;
            rendered.push(dest);
        } else {
            let dest = output_dir.join(name);
            std::fs::copy(&source, &dest).map_err(BuildError::io(&dest))?;
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_detect_vector_images() {
        assert!(is_vector(Path::new("images/triangle.svg")));
        assert!(is_vector(Path::new("images/TRIANGLE.SVG")));
        assert!(!is_vector(Path::new("images/triangle.png")));
        assert!(!is_vector(Path::new("images/svg")));
    }

    #[test]
    fn copies_raster_images_without_the_renderer() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = tempfile::tempdir().expect("can create temp dir");
        std::fs::write(input.path().join("photo.png"), b"png bytes").expect("can write");
        std::fs::write(input.path().join("clip.jpg"), b"jpg bytes").expect("can write");

        let converted = output.path().join("converted");
        let inkscape = Tool::new("vk-ebook-no-such-inkscape", "install inkscape");
        let rendered = convert_images(&inkscape, input.path(), &converted).expect("no svgs");

        assert!(rendered.is_empty());
        assert_eq!(
            std::fs::read(converted.join("photo.png")).expect("copied"),
            b"png bytes"
        );
        assert!(converted.join("clip.jpg").is_file());
        assert!(input.path().join("photo.png").is_file());
    }

    #[test]
    fn missing_renderer_is_fatal_for_vector_images() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = tempfile::tempdir().expect("can create temp dir");
        std::fs::write(input.path().join("diagram.svg"), "<svg/>").expect("can write");

        let inkscape = Tool::new("vk-ebook-no-such-inkscape", "install inkscape");
        let err = convert_images(&inkscape, input.path(), output.path()).unwrap_err();
        assert!(matches!(err, BuildError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_renderer_reports_conversion_failure() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = tempfile::tempdir().expect("can create temp dir");
        std::fs::write(input.path().join("diagram.svg"), "<svg/>").expect("can write");

        let inkscape = Tool::new("false", "install inkscape");
        let err = convert_images(&inkscape, input.path(), output.path()).unwrap_err();
        match err {
            BuildError::ConversionFailed { input: failed, .. } => {
                assert_eq!(failed, input.path().join("diagram.svg"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn can_rasterise_vector_images() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("images");
        let output = dir.path().join("converted_images");
        std::fs::create_dir(&input).expect("can create images");
        std::fs::write(input.join("foo.svg"), "<svg/>").expect("can write");
        std::fs::write(input.join("bar.png"), b"png bytes").expect("can write");

        let inkscape = Tool::new(
            crate::test_helpers::inkscape(dir.path()).display().to_string(),
            "install inkscape",
        );
        let rendered = convert_images(&inkscape, &input, &output).expect("can convert");
        assert_eq!(rendered, vec![output.join("foo.png")]);
        assert_eq!(std::fs::read(output.join("foo.png")).expect("rendered"), b"png");
        assert!(output.join("bar.png").is_file());
        assert!(!output.join("foo.svg").exists());
        assert!(input.join("foo.svg").is_file());

        let again = convert_images(&inkscape, &input, &output).expect("can convert again");
        assert_eq!(again, rendered);
        assert_eq!(std::fs::read(output.join("foo.png")).expect("rendered"), b"png");
    }

    #[cfg(unix)]
    #[test]
    fn rewritten_references_point_at_rendered_rasters() {
        use crate::assemble::Assembler;
        use crate::chapters::Chapter;

        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("images");
        let output = dir.path().join("converted_images");
        std::fs::create_dir(&input).expect("can create images");
        std::fs::write(input.join("foo.svg"), "<svg/>").expect("can write");

        let inkscape = Tool::new(
            crate::test_helpers::inkscape(dir.path()).display().to_string(),
            "install inkscape",
        );
        convert_images(&inkscape, &input, &output).expect("can convert");

        let assembler = Assembler {
            title: "Vulkan Tutorial",
            author: "Alexander Overvoorde",
            date: "October 2026".to_string(),
            raster_dir: &output,
            base_url: "https://vulkan-tutorial.com",
            site_prefixes: &[],
        };
        let chapter = Chapter {
            title: "Intro".to_string(),
            order_key: "00.".to_string(),
            depth: 0,
            content: "![](/images/foo.svg)".to_string(),
        };
        let text = assembler.chapter(&chapter);
        let reference = format!("![]({}/foo.png)", output.display());
        assert!(text.contains(&reference), "{text}");
        assert!(output.join("foo.png").is_file());
    }

    #[test]
    fn missing_image_directory_produces_nothing() {
        let output = tempfile::tempdir().expect("can create temp dir");
        let converted = output.path().join("converted");
        let inkscape = Tool::new("vk-ebook-no-such-inkscape", "install inkscape");
        let rendered =
            convert_images(&inkscape, &output.path().join("images"), &converted).expect("empty");
        assert!(rendered.is_empty());
        assert!(converted.is_dir());
    }
}
