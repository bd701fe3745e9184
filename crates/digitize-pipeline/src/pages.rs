// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page images written by the capture step.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use digitize_core::error::{DigitizeError, Result};
use tracing::debug;

/// File pattern `scanimage --batch` uses for its pages (`out1.tif`, `out2.tif`, ...).
pub const PAGE_PATTERN: &str = "out*.tif";

/// Page images in `workdir`, in scan order.
///
/// Pages are ordered by the number in their name so that `out10.tif` follows
/// `out9.tif`. Names without a number sort after numbered ones.
pub fn collect_pages(workdir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&workdir.to_string_lossy()),
        PAGE_PATTERN
    );

    let mut pages = Vec::new();
    let entries = glob::glob(&pattern).map_err(|err| {
        DigitizeError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            err.to_string(),
        ))
    })?;
    for entry in entries {
        let path = entry.map_err(std::io::Error::from)?;
        if path.is_file() {
            pages.push(path);
        }
    }

    if pages.is_empty() {
        return Err(DigitizeError::NoPages(workdir.to_path_buf()));
    }

    pages.sort_by(|a, b| compare_pages(a, b));
    debug!(count = pages.len(), ?pages, "page images collected");
    Ok(pages)
}

fn page_number(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.strip_prefix("out")?.parse().ok()
}

fn compare_pages(a: &Path, b: &Path) -> Ordering {
    match (page_number(a), page_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
