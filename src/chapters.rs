//! Chapter discovery for one language edition.
//!
//! Every entry in a language tree is named `<order>_<Label_Words>`, for example
//! `03_Drawing_a_triangle/01_Setup/00_Base_code.md`. The order tokens of each
//! path segment are joined into an ordering key (`03.01.00.`) so that sorting the
//! keys lexicographically yields book order, with a directory placed right before
//! its own contents. Directories become chapters too (with no content) so nested
//! chapters have a parent heading to live under.

use crate::error::BuildError;
use ignore::WalkBuilder;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub order_key: String,
    /// Directory levels below the language root; top-level entries are 0
    pub depth: usize,
    pub content: String,
}

/// Split an entry name into its ordering token and human readable label.
///
/// The extension is dropped, the token is everything before the first `_` and
/// the label is everything after it with the remaining underscores turned into
/// spaces. A name without `_` is its own token and label.
pub fn split_name(name: &str) -> (&str, String) {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    match stem.split_once('_') {
        Some((token, label)) => (token, label.replace('_', " ")),
        None => (stem, stem.to_string()),
    }
}

/// The ordering key of `relative`, a path below the language root.
pub fn order_key(relative: &Path) -> String {
    relative
        .iter()
        .map(|segment| {
            let segment = segment.to_string_lossy();
            let (token, _) = split_name(&segment);
            format!("{token}.")
        })
        .collect()
}

/// Collect every chapter below `root`, sorted into book order.
///
/// Entries whose name starts with `excluded_prefix` (the privacy policy) are
/// skipped along with anything below them. Hidden entries are ignored.
pub fn collect_chapters(root: &Path, excluded_prefix: &str) -> Result<Vec<Chapter>, BuildError> {
    if !root.is_dir() {
        return Err(BuildError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "language directory doesn't exist",
            ),
        });
    }

    let excluded_prefix = excluded_prefix.to_string();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(move |entry| {
            excluded_prefix.is_empty()
                || entry.depth() == 0
                || !entry.file_name().to_string_lossy().starts_with(&excluded_prefix)
        })
        .build();

    let mut chapters = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| BuildError::Io {
            path: root.to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("failed to walk directory")),
        })?;
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy();
        let (_, title) = split_name(&name);
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        let content = if is_dir {
            String::new()
        } else {
            log::debug!("reading chapter {}", path.display());
            std::fs::read_to_string(path).map_err(|source| BuildError::ReadError {
                path: path.to_path_buf(),
                source,
            })?
        };

        chapters.push(Chapter {
            title,
            order_key: order_key(relative),
            depth: entry.depth() - 1,
            content,
        });
    }

    chapters.sort_by(|a, b| a.order_key.cmp(&b.order_key).then_with(|| a.title.cmp(&b.title)));
    Ok(chapters)
}
