// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for digitize.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all digitize operations.
#[derive(Debug, Error)]
pub enum DigitizeError {
    // -- Request errors --
    #[error("invalid resolution {value:?}; use one of {valid}")]
    InvalidResolution { value: String, valid: String },

    #[error("invalid date {0:?}: it contains no digits")]
    InvalidDate(String),

    #[error("profile not found: {name}")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("cannot read profiles from {path}: {detail}")]
    ProfileFile { path: PathBuf, detail: String },

    #[error("output directory must already exist: {0}")]
    OutputDirectoryMissing(PathBuf),

    // -- External tools --
    #[error("{tool} command not found")]
    ToolMissing { tool: String, package: String },

    #[error("{tool} failed ({}): {stderr}", exit_label(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("the scanner produced no pages in {0}")]
    NoPages(PathBuf),

    // -- Documents / filesystem --
    #[error("PDF inspection failed: {0}")]
    Pdf(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DigitizeError {
    /// Whether the error stems from bad input rather than a failing system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidResolution { .. }
                | Self::InvalidDate(_)
                | Self::ProfileNotFound { .. }
                | Self::ProfileFile { .. }
                | Self::OutputDirectoryMissing(_)
        )
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "killed by signal".to_string(),
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DigitizeError>;
