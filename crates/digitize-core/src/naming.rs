// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output naming: timestamps, slugs and resolution of the destination path.
//
// The destination must already exist: either as a directory (a filename is
// synthesized inside it) or as the parent of an explicit file path. Nothing in
// here creates directories.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::{DigitizeError, Result};

/// Timestamp format used for synthesized filenames, e.g. `20240131-142500`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Format the run's start time for use in a filename.
pub fn timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Turn a user-supplied date such as `2020-01-02` into `20200102`.
///
/// Every character that is not an ASCII digit is dropped.
pub fn date_override(date: &str) -> Result<String> {
    let digits: String = date.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(DigitizeError::InvalidDate(date.to_string()));
    }
    Ok(digits)
}

/// Lower-cased, hyphenated, filesystem-safe form of `text`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        let folded = if ch.is_ascii_alphanumeric() {
            &*ch.encode_utf8(&mut buf)
        } else {
            match fold_latin(ch) {
                Some(folded) => folded,
                None => {
                    pending_dash = true;
                    continue;
                }
            }
        };
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push_str(folded);
    }

    slug
}

/// ASCII spelling of a lower-case Latin-1 letter.
fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

/// `<stamp>.pdf`, or `<stamp>-<slug>.pdf` when `name` slugifies to something.
pub fn output_filename(stamp: &str, name: Option<&str>) -> String {
    match name.map(slugify).filter(|slug| !slug.is_empty()) {
        Some(slug) => format!("{stamp}-{slug}.pdf"),
        None => format!("{stamp}.pdf"),
    }
}

/// Decide the absolute file path the finished PDF is moved to.
///
/// - `dest` is an existing directory: a filename is synthesized inside it.
/// - `dest`'s parent exists (or `dest` is a bare filename): `dest` is used as is.
/// - `dest` ends in a path separator but is not a directory, or its parent is
///   missing: [`DigitizeError::OutputDirectoryMissing`].
pub fn resolve_output_path(dest: &Path, stamp: &str, name: Option<&str>) -> Result<PathBuf> {
    let path = if dest.is_dir() {
        dest.join(output_filename(stamp, name))
    } else if names_directory(dest) {
        return Err(DigitizeError::OutputDirectoryMissing(dest.to_path_buf()));
    } else {
        match dest.parent() {
            Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => dest.to_path_buf(),
            None => dest.to_path_buf(),
            Some(parent) => {
                return Err(DigitizeError::OutputDirectoryMissing(parent.to_path_buf()));
            }
        }
    };

    let absolute = std::path::absolute(&path)?;
    debug!(output = %absolute.display(), "output path resolved");
    Ok(absolute)
}

/// Whether `dest` was written with a trailing separator, e.g. `out/`.
fn names_directory(dest: &Path) -> bool {
    dest.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("My Document"), "my-document");
        assert_eq!(slugify("  Tax return: 2024 (final)!  "), "tax-return-2024-final");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn slugify_folds_accented_letters() {
        assert_eq!(slugify("Größe Übersicht"), "grosse-ubersicht");
        assert_eq!(slugify("Café crème"), "cafe-creme");
    }

    #[test]
    fn slugify_of_punctuation_is_empty() {
        assert_eq!(slugify("--- !!! ---"), "");
    }

    #[test]
    fn timestamp_format() {
        let at = Local
            .with_ymd_and_hms(2024, 1, 31, 14, 25, 0)
            .single()
            .expect("unambiguous local time");
        assert_eq!(timestamp(at), "20240131-142500");
    }

    #[test]
    fn date_override_strips_non_digits() {
        assert_eq!(date_override("2020-01-02").expect("digits"), "20200102");
        assert_eq!(date_override("2020-01-02 13:45").expect("digits"), "202001021345");
        assert!(date_override("yesterday").is_err());
    }

    #[test]
    fn filename_with_and_without_name() {
        assert_eq!(output_filename("20200102", None), "20200102.pdf");
        assert_eq!(
            output_filename("20240131-142500", Some("My Document")),
            "20240131-142500-my-document.pdf"
        );
        assert_eq!(output_filename("20200102", Some("???")), "20200102.pdf");
    }

    #[test]
    fn existing_directory_gets_synthesized_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = resolve_output_path(dir.path(), "20240131-142500", Some("My Document"))
            .expect("resolve");
        assert_eq!(path, dir.path().join("20240131-142500-my-document.pdf"));
    }

    #[test]
    fn explicit_file_in_existing_directory_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("letter.pdf");
        let path = resolve_output_path(&dest, "ignored", Some("ignored")).expect("resolve");
        assert_eq!(path, dest);
    }

    #[test]
    fn bare_filename_resolves_against_cwd() {
        let path = resolve_output_path(Path::new("scan-result.pdf"), "x", None).expect("resolve");
        assert!(path.is_absolute());
        assert!(path.ends_with("scan-result.pdf"));
    }

    #[test]
    fn missing_parent_directory_is_rejected() {
        let err = resolve_output_path(Path::new("/nonexistent-dir/out.pdf"), "x", None)
            .expect_err("parent does not exist");
        assert!(matches!(err, DigitizeError::OutputDirectoryMissing(ref p) if p == Path::new("/nonexistent-dir")));
        assert!(!Path::new("/nonexistent-dir").exists());
    }

    #[test]
    fn missing_directory_with_trailing_separator_is_rejected() {
        let err = resolve_output_path(Path::new("no-such-dir-xyz/"), "x", None)
            .expect_err("relative directory does not exist");
        assert!(matches!(err, DigitizeError::OutputDirectoryMissing(ref p) if p == Path::new("no-such-dir-xyz/")));

        let base = tempfile::tempdir().expect("tempdir");
        let dest = base.path().join("no-such-dir").join("");
        let err = resolve_output_path(&dest, "x", None)
            .expect_err("absolute directory does not exist");
        assert!(matches!(err, DigitizeError::OutputDirectoryMissing(_)));
        assert!(!base.path().join("no-such-dir").exists());
    }
}
