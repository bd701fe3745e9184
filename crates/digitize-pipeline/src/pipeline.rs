// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The scan pipeline: one strictly sequential run per invocation.
//
// Each step blocks until its external program exits. A failing step ends the
// run; the working directory is then kept so the intermediate files can be
// inspected.

use std::fmt;
use std::path::{Path, PathBuf};

use digitize_core::error::Result;
use digitize_core::types::ScanRequest;
use tracing::{info, instrument, warn};

use crate::inspect;
use crate::pages::collect_pages;
use crate::tools::{CaptureOptions, ScanTools};
use crate::workdir::WorkDir;

/// Multi-page TIFF produced by the combine step.
pub const COMBINED_TIFF: &str = "output.tif";
/// PDF produced by the convert step.
pub const CONVERTED_PDF: &str = "output.pdf";
/// PDF produced by the OCR step.
pub const CLEANED_PDF: &str = "clean.pdf";

/// Progress milestones reported while a run is under way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    Scanning,
    Combining,
    Converting,
    Recognizing,
    Moving,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Preparing => "Creating temporary directory...",
            Self::Scanning => "Scanning...",
            Self::Combining => "Combining image files...",
            Self::Converting => "Converting to PDF...",
            Self::Recognizing => "Running OCR...",
            Self::Moving => "Moving resulting file...",
        };
        f.write_str(text)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Where the finished PDF now lives.
    pub output: PathBuf,
    /// Number of pages in the PDF (page images scanned, if the PDF could not be read).
    pub pages: usize,
    pub ocr_applied: bool,
    /// Set when the working directory was left on disk.
    pub workdir_kept: Option<PathBuf>,
}

type ProgressFn = Box<dyn Fn(Stage)>;

/// Orchestrates the external tools for one scan.
pub struct ScanPipeline<T: ScanTools> {
    tools: T,
    workdir_base: Option<PathBuf>,
    progress: Option<ProgressFn>,
}

impl<T: ScanTools> ScanPipeline<T> {
    pub fn new(tools: T) -> Self {
        Self {
            tools,
            workdir_base: None,
            progress: None,
        }
    }

    /// Create working directories under `base` instead of the system temp dir.
    pub fn with_workdir_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.workdir_base = Some(base.into());
        self
    }

    /// Call `progress` as each step starts.
    pub fn with_progress(mut self, progress: impl Fn(Stage) + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    fn report(&self, stage: Stage) {
        info!(%stage, "pipeline stage");
        if let Some(progress) = &self.progress {
            progress(stage);
        }
    }

    /// Scan, combine, convert, optionally OCR, and move the PDF to
    /// `request.output`.
    #[instrument(skip_all, fields(output = %request.output.display(), skip_ocr = request.skip_ocr))]
    pub fn run(&self, request: &ScanRequest) -> Result<ScanReport> {
        self.tools.preflight(request.skip_ocr)?;

        self.report(Stage::Preparing);
        let workdir = WorkDir::create(self.workdir_base.as_deref())?;

        match self.process(request, &workdir) {
            Ok(mut report) => {
                if request.keep_workdir {
                    let kept = workdir.keep();
                    info!(workdir = %kept.display(), "working directory kept");
                    report.workdir_kept = Some(kept);
                } else {
                    workdir.remove();
                }
                Ok(report)
            }
            Err(err) => {
                let kept = workdir.keep();
                warn!(workdir = %kept.display(), error = %err, "scan failed; intermediate files kept");
                Err(err)
            }
        }
    }

    fn process(&self, request: &ScanRequest, workdir: &WorkDir) -> Result<ScanReport> {
        let dir = workdir.path();

        self.report(Stage::Scanning);
        self.tools.capture(dir, &CaptureOptions::from(request))?;
        let pages = collect_pages(dir)?;
        info!(pages = pages.len(), "pages scanned");

        self.report(Stage::Combining);
        let combined = workdir.join(COMBINED_TIFF);
        self.tools.combine(dir, &pages, &combined)?;

        self.report(Stage::Converting);
        let converted = workdir.join(CONVERTED_PDF);
        self.tools.convert(dir, &combined, &converted, request.paper)?;

        let page_total = match inspect::page_count(&converted) {
            Ok(count) => {
                if count != pages.len() {
                    warn!(pdf = count, images = pages.len(), "PDF page count differs from scanned images");
                }
                count
            }
            Err(err) => {
                warn!(error = %err, "could not inspect converted PDF");
                pages.len()
            }
        };
        if let Some(expected) = request.expected_pages {
            if usize::try_from(expected).ok() != Some(page_total) {
                warn!(expected, scanned = page_total, "page count differs from the announced count");
            }
        }

        let result = if request.skip_ocr {
            converted
        } else {
            self.report(Stage::Recognizing);
            let cleaned = workdir.join(CLEANED_PDF);
            self.tools.ocr(dir, &converted, &cleaned, &request.keywords)?;
            cleaned
        };

        self.report(Stage::Moving);
        finalize(&result, &request.output)?;

        Ok(ScanReport {
            output: request.output.clone(),
            pages: page_total,
            ocr_applied: !request.skip_ocr,
            workdir_kept: None,
        })
    }
}

/// Move `source` to `dest`, copying when the two are on different filesystems.
pub fn finalize(source: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::CrossesDevices => {
            std::fs::copy(source, dest)?;
            std::fs::remove_file(source)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
