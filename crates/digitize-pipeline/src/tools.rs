// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External tools: one operation per command-line program.
//
// | Step    | Program     | Package   |
// |---------|-------------|-----------|
// | capture | `scanimage` | sane      |
// | combine | `tiffcp`    | libtiff   |
// | convert | `tiff2pdf`  | libtiff   |
// | ocr     | `ocrmypdf`  | ocrmypdf  |
//
// `ocrmypdf` in turn needs `tesseract` and `unpaper` on the PATH. The argument
// vectors below are part of the program's contract and must not drift.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use digitize_core::error::{DigitizeError, Result};
use digitize_core::types::{Keywords, PaperSize, Resolution, ScanRequest};
use tracing::{debug, info, instrument};

/// Exit codes of `scanimage` that end a batch normally (7 = feeder empty).
pub const CAPTURE_OK_CODES: &[i32] = &[0, 7];

/// Recognition language passed to the OCR tool.
pub const OCR_LANGUAGE: &str = "deu";

/// Everything the capture step needs to know about the scan.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions<'a> {
    pub device: &'a str,
    pub resolution: Resolution,
    pub paper: PaperSize,
}

impl<'a> From<&'a ScanRequest> for CaptureOptions<'a> {
    fn from(request: &'a ScanRequest) -> Self {
        Self {
            device: &request.device,
            resolution: request.resolution,
            paper: request.paper,
        }
    }
}

/// The external programs the pipeline drives.
///
/// Every operation runs with `workdir` as its current directory. Implementations
/// other than [`SystemTools`] exist for tests.
pub trait ScanTools {
    /// Verify that every program needed for this run is installed.
    fn preflight(&self, _skip_ocr: bool) -> Result<()> {
        Ok(())
    }

    /// Scan all pages from the feeder into `out<N>.tif` files in `workdir`.
    fn capture(&self, workdir: &Path, options: &CaptureOptions<'_>) -> Result<()>;

    /// Merge the page images, in the given order, into one multi-page TIFF.
    fn combine(&self, workdir: &Path, pages: &[PathBuf], target: &Path) -> Result<()>;

    /// Render a multi-page TIFF into a PDF.
    fn convert(&self, workdir: &Path, source: &Path, target: &Path, paper: PaperSize)
    -> Result<()>;

    /// Add a text layer, deskew and clean the PDF, attaching `keywords`.
    fn ocr(&self, workdir: &Path, source: &Path, target: &Path, keywords: &Keywords)
    -> Result<()>;
}

/// A fully prepared invocation of one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: &'static str,
    pub package: &'static str,
    pub args: Vec<OsString>,
    pub ok_codes: &'static [i32],
}

impl ToolCommand {
    fn new(program: &'static str, package: &'static str) -> Self {
        Self {
            program,
            package,
            args: Vec::new(),
            ok_codes: &[0],
        }
    }

    fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run the program in `workdir`, mapping unexpected exit codes to
    /// [`DigitizeError::ToolFailed`] with the program's own stderr.
    #[instrument(skip_all, fields(program = self.program))]
    pub fn run(&self, workdir: &Path) -> Result<()> {
        debug!(args = ?self.args, workdir = %workdir.display(), "running external tool");

        let output = Command::new(self.program)
            .args(&self.args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => DigitizeError::ToolMissing {
                    tool: self.program.to_string(),
                    package: self.package.to_string(),
                },
                _ => DigitizeError::Io(err),
            })?;

        let code = output.status.code();
        match code {
            Some(code) if self.ok_codes.contains(&code) => {
                if code != 0 {
                    info!(code, "tolerated exit code");
                }
                Ok(())
            }
            _ => Err(DigitizeError::ToolFailed {
                tool: self.program.to_string(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

/// `scanimage -x 210 -y 297 --device-name=<dev> --batch --format=tiff --resolution=<dpi>`
pub fn capture_command(options: &CaptureOptions<'_>) -> ToolCommand {
    let (width, height) = options.paper.dimensions_mm();
    let mut command = ToolCommand::new("scanimage", "sane")
        .arg("-x")
        .arg(width.to_string())
        .arg("-y")
        .arg(height.to_string())
        .arg(format!("--device-name={}", options.device))
        .arg("--batch")
        .arg("--format=tiff")
        .arg(format!("--resolution={}", options.resolution));
    command.ok_codes = CAPTURE_OK_CODES;
    command
}

/// `tiffcp -c lzw <pages...> <target>`
pub fn combine_command(pages: &[PathBuf], target: &Path) -> ToolCommand {
    let mut command = ToolCommand::new("tiffcp", "libtiff").arg("-c").arg("lzw");
    for page in pages {
        command = command.arg(page);
    }
    command.arg(target)
}

/// `tiff2pdf -p <paper> -o <target> <source>`
pub fn convert_command(source: &Path, target: &Path, paper: PaperSize) -> ToolCommand {
    ToolCommand::new("tiff2pdf", "libtiff")
        .arg("-p")
        .arg(paper.tool_name())
        .arg("-o")
        .arg(target)
        .arg(source)
}

/// `ocrmypdf -l deu -d -c [--keywords <k1,k2>] <source> <target>`
pub fn ocr_command(source: &Path, target: &Path, keywords: &Keywords) -> ToolCommand {
    let mut command = ToolCommand::new("ocrmypdf", "ocrmypdf")
        .arg("-l")
        .arg(OCR_LANGUAGE)
        .arg("-d")
        .arg("-c");
    if !keywords.is_empty() {
        command = command.arg("--keywords").arg(keywords.joined());
    }
    command.arg(source).arg(target)
}

/// A program that must be on the PATH, and the package that provides it.
#[derive(Debug, Clone, Copy)]
pub struct ToolRequirement {
    pub tool: &'static str,
    pub package: &'static str,
    /// Only needed when the OCR step runs.
    pub ocr_only: bool,
}

pub const REQUIREMENTS: &[ToolRequirement] = &[
    ToolRequirement { tool: "scanimage", package: "sane", ocr_only: false },
    ToolRequirement { tool: "tiffcp", package: "libtiff", ocr_only: false },
    ToolRequirement { tool: "tiff2pdf", package: "libtiff", ocr_only: false },
    ToolRequirement { tool: "ocrmypdf", package: "ocrmypdf", ocr_only: true },
    ToolRequirement { tool: "tesseract", package: "tesseract", ocr_only: true },
    ToolRequirement { tool: "unpaper", package: "unpaper", ocr_only: true },
];

/// The requirements that apply to a run with or without OCR.
pub fn requirements(skip_ocr: bool) -> impl Iterator<Item = &'static ToolRequirement> {
    REQUIREMENTS
        .iter()
        .filter(move |req| !(skip_ocr && req.ocr_only))
}

/// Runs the real programs found on the PATH.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTools;

impl ScanTools for SystemTools {
    fn preflight(&self, skip_ocr: bool) -> Result<()> {
        for req in requirements(skip_ocr) {
            let found = which::which(req.tool).map_err(|_| DigitizeError::ToolMissing {
                tool: req.tool.to_string(),
                package: req.package.to_string(),
            })?;
            debug!(tool = req.tool, path = %found.display(), "tool found");
        }
        Ok(())
    }

    fn capture(&self, workdir: &Path, options: &CaptureOptions<'_>) -> Result<()> {
        capture_command(options).run(workdir)
    }

    fn combine(&self, workdir: &Path, pages: &[PathBuf], target: &Path) -> Result<()> {
        combine_command(pages, target).run(workdir)
    }

    fn convert(
        &self,
        workdir: &Path,
        source: &Path,
        target: &Path,
        paper: PaperSize,
    ) -> Result<()> {
        convert_command(source, target, paper).run(workdir)
    }

    fn ocr(
        &self,
        workdir: &Path,
        source: &Path,
        target: &Path,
        keywords: &Keywords,
    ) -> Result<()> {
        ocr_command(source, target, keywords).run(workdir)
    }
}
