// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only inspection of the generated PDF using the `lopdf` crate.

use std::path::Path;

use digitize_core::error::{DigitizeError, Result};
use lopdf::Document;
use tracing::{debug, instrument};

/// Number of pages in the PDF at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn page_count(path: &Path) -> Result<usize> {
    let document = Document::load(path).map_err(|err| {
        DigitizeError::Pdf(format!("failed to open {}: {}", path.display(), err))
    })?;
    let pages = document.get_pages().len();
    debug!(pages, "PDF inspected");
    Ok(pages)
}
