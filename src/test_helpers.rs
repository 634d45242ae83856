//! Stand-ins for the external converters, used by unit tests.
//!
//! Each one is a small `sh` script that behaves just enough like the real tool
//! for the build to go through: it writes the file it was asked to produce.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `sh` script named `name` into `dir`.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("can write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("can make script executable");
    path
}

/// Writes a placeholder PNG to the `--export-filename=` target, like Inkscape.
pub fn inkscape(dir: &Path) -> PathBuf {
    script(
        dir,
        "fake-inkscape",
        r#"for arg in "$@"; do
  case "$arg" in
    --export-filename=*) dest="${arg#--export-filename=}" ;;
  esac
done
printf 'png' > "$dest""#,
    )
}

/// Writes a placeholder book to the `-o` target, like pandoc. Any output whose
/// name ends with `fail_suffix` is refused with a non-zero exit instead.
pub fn pandoc(dir: &Path, fail_suffix: Option<&str>) -> PathBuf {
    let refuse = match fail_suffix {
        Some(suffix) => format!(
            r#"case "$out" in *{suffix}) echo "cannot write $out" >&2; exit 1 ;; esac"#
        ),
        None => String::new(),
    };
    script(
        dir,
        "fake-pandoc",
        &format!(
            r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; fi
  shift
done
{refuse}
printf 'book' > "$out""#
        ),
    )
}
