// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// digitize-pipeline: Drives the external scanning tool chain.
//
// capture (scanimage) → combine (tiffcp) → convert (tiff2pdf) → optional OCR
// (ocrmypdf) → move the result to its destination. Every step runs inside a
// fresh working directory.

pub mod inspect;
pub mod pages;
pub mod pipeline;
pub mod tools;
pub mod workdir;

pub use pipeline::{ScanPipeline, ScanReport, Stage};
pub use tools::{ScanTools, SystemTools};
pub use workdir::WorkDir;
