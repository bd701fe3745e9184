// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every error is mapped to a one-line message and a suggestion telling the user
// what to change before running the scan again.

use crate::error::DigitizeError;

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Printed after `error:`.
    pub message: String,
    /// Printed after `hint:`; may span several lines.
    pub suggestion: String,
}

/// Convert a `DigitizeError` into text a user can act on.
pub fn humanize_error(err: &DigitizeError) -> HumanError {
    match err {
        DigitizeError::InvalidResolution { value, valid } => HumanError {
            message: format!("Invalid resolution {value:?}."),
            suggestion: format!("Please use one of {valid}."),
        },

        DigitizeError::InvalidDate(date) => HumanError {
            message: format!("The date {date:?} contains no digits."),
            suggestion: "Pass the date as e.g. 2020-01-02; everything except digits is dropped."
                .into(),
        },

        DigitizeError::ProfileNotFound { name, available } => HumanError {
            message: format!("Profile not found: {name}"),
            suggestion: if available.is_empty() {
                "No profiles are defined at that level. Check your profiles.toml.".into()
            } else {
                format!("Available profiles:\n  {}", available.join("\n  "))
            },
        },

        DigitizeError::ProfileFile { path, detail } => HumanError {
            message: format!("The profile file {} could not be used.", path.display()),
            suggestion: format!(
                "Create profiles.toml in the current directory or pass --config FILE. ({detail})"
            ),
        },

        DigitizeError::OutputDirectoryMissing(dir) => HumanError {
            message: "Output directory must already exist.".into(),
            suggestion: format!("Create {} first, or choose another destination.", dir.display()),
        },

        DigitizeError::ToolMissing { tool, package } => HumanError {
            message: format!("{tool} command not found."),
            suggestion: format!("Please install {package}."),
        },

        DigitizeError::ToolFailed { tool, stderr, .. } => HumanError {
            message: format!("{tool} failed."),
            suggestion: if stderr.is_empty() {
                "Check that the scanner is switched on and reachable, then try again.".into()
            } else {
                stderr.clone()
            },
        },

        DigitizeError::NoPages(_) => HumanError {
            message: "The scanner did not deliver any pages.".into(),
            suggestion: "Put the pages into the document feeder and try again.".into(),
        },

        DigitizeError::Pdf(detail) => HumanError {
            message: "The generated PDF could not be read.".into(),
            suggestion: detail.clone(),
        },

        DigitizeError::Io(io_err) => HumanError {
            message: "A file operation failed.".into(),
            suggestion: format!("Check permissions and free disk space. ({io_err})"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn profile_suggestions_are_listed() {
        let human = humanize_error(&DigitizeError::ProfileNotFound {
            name: "wrok".into(),
            available: vec!["home".into(), "work".into()],
        });
        assert!(human.message.contains("wrok"));
        assert!(human.suggestion.contains("home"));
        assert!(human.suggestion.contains("work"));
    }

    #[test]
    fn tool_stderr_is_surfaced_verbatim() {
        let human = humanize_error(&DigitizeError::ToolFailed {
            tool: "scanimage".into(),
            code: Some(9),
            stderr: "scanimage: open of device failed: Invalid argument".into(),
        });
        assert_eq!(
            human.suggestion,
            "scanimage: open of device failed: Invalid argument"
        );
    }

    #[test]
    fn missing_output_dir_names_directory() {
        let human = humanize_error(&DigitizeError::OutputDirectoryMissing(PathBuf::from(
            "/nonexistent-dir",
        )));
        assert!(human.suggestion.contains("/nonexistent-dir"));
    }
}
