//! Combining an edition's chapters into one pandoc Markdown document.
//!
//! The chapters are written for the website, so a few things have to be fixed up
//! before pandoc sees them: nested chapters need their headings pushed down,
//! images must point at the converted rasters, site-relative links have to
//! become absolute, and `!`-style chapter links must target heading anchors.

use crate::chapters::Chapter;
use crate::images::{RASTER_EXTENSION, VECTOR_EXTENSION};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( {0,3})(#+) ").unwrap());

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})(.*)$").unwrap());

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<lead>[(\s"'=])/?images/(?P<name>[^)\s"']+)"#).unwrap()
});

static CHAPTER_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(!([^)]+)\)").unwrap());

/// Everything the rewrite rules need besides the chapter itself.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    pub title: &'a str,
    pub author: &'a str,
    /// e.g. "October 2026"
    pub date: String,
    pub raster_dir: &'a Path,
    pub base_url: &'a str,
    pub site_prefixes: &'a [String],
}

impl Assembler<'_> {
    /// The pandoc title block that opens the document.
    pub fn front_matter(&self) -> String {
        format!("% {}\n% {}\n% {}", self.title, self.author, self.date)
    }

    /// Rewrite one chapter, applying every rule in order.
    pub fn chapter(&self, chapter: &Chapter) -> String {
        let contents = format!("# {}\n\n{}", chapter.title, chapter.content);
        let contents = shift_headings(&contents, chapter.depth);
        let contents = self.rewrite_images(&contents);
        let contents = self.rewrite_site_links(&contents);
        rewrite_chapter_links(&contents)
    }

    /// The front matter followed by every chapter, separated by blank lines.
    pub fn assemble(&self, chapters: &[Chapter]) -> String {
        std::iter::once(self.front_matter())
            .chain(chapters.iter().map(|chapter| self.chapter(chapter)))
            .collect::<Vec<String>>()
            .join("\n\n")
    }

    fn rewrite_images(&self, contents: &str) -> String {
        let raster_dir = self.raster_dir.display().to_string();
        let raster_dir = raster_dir.trim_end_matches('/');
        IMAGE_RE
            .replace_all(contents, |caps: &Captures| {
                let name = &caps["name"];
                let name = match name.rsplit_once('.') {
                    Some((stem, ext)) if ext.eq_ignore_ascii_case(VECTOR_EXTENSION) => {
                        format!("{stem}.{RASTER_EXTENSION}")
                    }
                    _ => name.to_string(),
                };
                format!("{}{raster_dir}/{name}", &caps["lead"])
            })
            .into_owned()
    }

    fn rewrite_site_links(&self, contents: &str) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        self.site_prefixes
            .iter()
            .fold(contents.to_string(), |contents, prefix| {
                contents.replace(&format!("({prefix}"), &format!("({base_url}{prefix}"))
            })
    }
}

/// Push every heading down by `depth` levels, leaving fenced code alone.
///
/// A fence only closes on a run of the same character at least as long as the
/// one that opened it, with nothing else on the line.
pub fn shift_headings(contents: &str, depth: usize) -> String {
    if depth == 0 {
        return contents.to_string();
    }

    let extra = "#".repeat(depth);
    let mut fence: Option<(char, usize)> = None;
    let mut lines = Vec::new();
    for line in contents.split('\n') {
        if let Some(caps) = FENCE_RE.captures(line) {
            let marker = &caps[1];
            let kind = marker.chars().next().unwrap_or('`');
            match fence {
                None => {
                    fence = Some((kind, marker.len()));
                    lines.push(line.to_string());
                    continue;
                }
                Some((open, len))
                    if open == kind && marker.len() >= len && caps[2].trim().is_empty() =>
                {
                    fence = None;
                    lines.push(line.to_string());
                    continue;
                }
                Some(_) => {}
            }
        }

        if fence.is_some() {
            lines.push(line.to_string());
            continue;
        }

        lines.push(
            HEADING_RE
                .replace(line, |caps: &Captures| {
                    format!("{}{extra}{} ", &caps[1], &caps[2])
                })
                .into_owned(),
        );
    }
    lines.join("\n")
}

/// Turn `](!en/03_Drawing/01_Base_code)` into `](#base-code)`.
///
/// The anchor is the last path segment, lower-cased, with underscores replaced
/// by hyphens, which is what pandoc derives from the matching heading.
pub fn rewrite_chapter_links(contents: &str) -> String {
    CHAPTER_LINK_RE
        .replace_all(contents, |caps: &Captures| {
            let target = caps[1].to_lowercase().replace('_', "-");
            let anchor = target.rsplit('/').next().unwrap_or(&target);
            format!("](#{anchor})")
        })
        .into_owned()
}
