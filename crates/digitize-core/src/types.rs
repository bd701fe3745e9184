// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for a single scan run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::DigitizeError;

/// Scanner resolutions accepted by the capture step, in DPI.
pub const VALID_RESOLUTIONS: [u32; 5] = [100, 200, 300, 400, 600];

/// SANE device used when neither a profile nor a flag names one.
pub const DEFAULT_DEVICE: &str = "brother4:net1;dev0";

/// Scanner resolution in DPI, restricted to [`VALID_RESOLUTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution(u32);

impl Resolution {
    pub fn dpi(self) -> u32 {
        self.0
    }

    fn invalid(value: impl Into<String>) -> DigitizeError {
        let valid = VALID_RESOLUTIONS
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        DigitizeError::InvalidResolution {
            value: value.into(),
            valid,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self(300)
    }
}

impl TryFrom<u32> for Resolution {
    type Error = DigitizeError;

    fn try_from(dpi: u32) -> Result<Self, Self::Error> {
        if VALID_RESOLUTIONS.contains(&dpi) {
            Ok(Self(dpi))
        } else {
            Err(Self::invalid(dpi.to_string()))
        }
    }
}

impl FromStr for Resolution {
    type Err = DigitizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dpi: u32 = s.trim().parse().map_err(|_| Self::invalid(s))?;
        Self::try_from(dpi).map_err(|_| Self::invalid(s))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standard paper sizes understood by the TIFF-to-PDF converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A4,
}

impl PaperSize {
    /// Name passed to `tiff2pdf -p`.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
        }
    }

    /// Scan area in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
        }
    }
}

/// Keyword metadata attached to the PDF by the OCR step.
///
/// Keeps the order in which keywords were given, dropping blanks and repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// Parse a comma-separated list such as `"tax, 2024,,invoice"`.
    pub fn parse(list: &str) -> Self {
        Self::from_iter(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-separated form handed to the OCR tool.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for Keywords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for keyword in iter {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() || keywords.iter().any(|k| k == keyword) {
                continue;
            }
            keywords.push(keyword.to_string());
        }
        Self(keywords)
    }
}

impl fmt::Display for Keywords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Everything one scan run needs, merged from defaults, profile and flags.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub resolution: Resolution,
    pub device: String,
    /// Absolute path the finished PDF is moved to.
    pub output: PathBuf,
    pub keywords: Keywords,
    pub skip_ocr: bool,
    /// Page count announced on the command line; only used for a sanity warning.
    pub expected_pages: Option<u32>,
    /// Leave the working directory in place after a successful run.
    pub keep_workdir: bool,
    pub paper: PaperSize,
}

impl ScanRequest {
    pub fn new(output: PathBuf) -> Self {
        Self {
            resolution: Resolution::default(),
            device: DEFAULT_DEVICE.to_string(),
            output,
            keywords: Keywords::default(),
            skip_ocr: false,
            expected_pages: None,
            keep_workdir: false,
            paper: PaperSize::A4,
        }
    }
}
