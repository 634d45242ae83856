//! Build configuration.
//!
//! Book metadata, paths and tool names come from an optional `ebook.toml`; every
//! field has a default matching the layout of the tutorial repository, so the
//! file only needs to mention what differs. The set of language editions comes
//! from the website's own `config.json`, which already lists every translation.

use crate::tool::Tool;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Page margins for the PDF, passed through to LaTeX's geometry package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub left: String,
    pub right: String,
    pub top: String,
    pub bottom: String,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            left: default_margin(),
            right: default_margin(),
            top: default_margin(),
            bottom: default_margin(),
        }
    }
}

fn default_margin() -> String {
    "2.5cm".to_string()
}

impl Geometry {
    /// `(side, length)` pairs in the order they are handed to pandoc.
    pub fn sides(&self) -> [(&'static str, &str); 4] {
        [
            ("left", self.left.as_str()),
            ("right", self.right.as_str()),
            ("top", self.top.as_str()),
            ("bottom", self.bottom.as_str()),
        ]
    }
}

/// Names of the external programs, in case they aren't on the PATH as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub inkscape: String,
    pub pandoc: String,
    pub xelatex: String,
}

impl Default for Tools {
    fn default() -> Self {
        Tools {
            inkscape: "inkscape".to_string(),
            pandoc: "pandoc".to_string(),
            xelatex: "xelatex".to_string(),
        }
    }
}

impl Tools {
    pub fn inkscape(&self) -> Tool {
        Tool::new(&self.inkscape, "install Inkscape from https://inkscape.org")
    }

    pub fn pandoc(&self) -> Tool {
        Tool::new(&self.pandoc, "install pandoc from https://pandoc.org")
    }

    pub fn xelatex(&self) -> Tool {
        Tool::new(
            &self.xelatex,
            "install a TeX distribution that ships xelatex, such as TeX Live",
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Book title, used in the title block
    pub title: String,
    pub author: String,
    /// Artifacts are named `<artifact_stem>_<language>.{pdf,epub}`
    pub artifact_stem: String,
    /// The website config listing the available languages
    pub site_config: PathBuf,
    /// Each language's chapters live in `<source_root>/<language>`
    pub source_root: PathBuf,
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    /// LaTeX header included to style code listings
    pub listings_header: PathBuf,
    pub cover_image: PathBuf,
    /// Links into these site-root paths are made absolute against `base_url`
    pub base_url: String,
    pub site_prefixes: Vec<String>,
    /// Chapters whose name starts with this are never part of the book
    pub privacy_prefix: String,
    pub geometry: Geometry,
    pub tools: Tools,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            title: "Vulkan Tutorial".to_string(),
            author: "Alexander Overvoorde".to_string(),
            artifact_stem: "vulkan_tutorial".to_string(),
            site_config: PathBuf::from("config.json"),
            source_root: PathBuf::from("."),
            images_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("ebook"),
            listings_header: PathBuf::from("ebook/listings-setup.tex"),
            cover_image: PathBuf::from("ebook/cover.png"),
            base_url: "https://vulkan-tutorial.com".to_string(),
            site_prefixes: vec!["/code".to_string(), "/resources".to_string()],
            privacy_prefix: "95_".to_string(),
            geometry: Geometry::default(),
            tools: Tools::default(),
        }
    }
}

impl Configuration {
    /// Load the configuration, falling back to the defaults if `path` doesn't exist.
    pub fn load(path: &Path) -> Result<Configuration> {
        if !path.exists() {
            log::debug!("{} not found, using default configuration", path.display());
            return Ok(Configuration::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The language identifiers listed in the site configuration, sorted.
    pub fn languages(&self) -> Result<Vec<String>> {
        let contents = std::fs::read_to_string(&self.site_config)
            .with_context(|| format!("Failed to load {}", self.site_config.display()))?;
        parse_languages(&contents)
            .with_context(|| format!("Failed to parse {}", self.site_config.display()))
    }
}

#[derive(Deserialize)]
struct SiteConfig {
    languages: BTreeMap<String, serde_json::Value>,
}

fn parse_languages(contents: &str) -> Result<Vec<String>> {
    let site: SiteConfig = serde_json::from_str(contents)?;
    if site.languages.is_empty() {
        return Err(anyhow!("No languages are configured"));
    }
    Ok(site.languages.into_keys().collect())
}
