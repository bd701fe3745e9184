// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// digitize: Core types, error definitions, profiles and output naming shared
// by the pipeline and the command-line front end.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod naming;
pub mod types;

pub use config::{ProfileDocument, ProfileSettings};
pub use error::DigitizeError;
pub use types::*;
