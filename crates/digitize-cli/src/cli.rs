// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use digitize_core::types::Resolution;

const EXAMPLES: &str = "\
Examples:
    digitize out/
    digitize out/document.pdf
    digitize out/ -n document
    digitize -p work.invoices -k tax,2024";

/// Scan pages from the document feeder, merge them into a PDF, run OCR and
/// file the result.
#[derive(Parser, Debug, Default)]
#[command(name = "digitize", version, about, after_help = EXAMPLES)]
pub struct Cli {
    /// Output file, or existing directory to create a timestamped file in
    /// [default: current directory]
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Same as the positional OUTPUT
    #[arg(short = 'o', long = "output", value_name = "OUTPUT", conflicts_with = "output")]
    pub output_flag: Option<PathBuf>,

    /// The profile to use, e.g. `work.invoices`
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<String>,

    /// Text that will be incorporated into the filename
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Date used in the filename instead of the current time, e.g. 2020-01-02
    #[arg(short = 't', long = "date")]
    pub date: Option<String>,

    /// Comma-separated keywords stored in the PDF metadata
    #[arg(short = 'k', long = "keywords")]
    pub keywords: Option<String>,

    /// Set the device [default: brother4:net1;dev0]
    #[arg(short = 'd', long = "device")]
    pub device: Option<String>,

    /// Set the resolution in DPI: 100, 200, 300, 400 or 600 [default: 300]
    #[arg(short = 'r', long = "resolution", value_name = "DPI")]
    pub resolution: Option<Resolution>,

    /// Page count to scan [default: all pages from ADF]
    #[arg(short = 'c', long = "pages", value_name = "PAGES")]
    pub pages: Option<u32>,

    /// Don't run OCR / straightening / cleanup step
    #[arg(long = "skip-ocr")]
    pub skip_ocr: bool,

    /// Profile file [default: ./profiles.toml, then ~/.config/digitize/profiles.toml]
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep the working directory with the page images after a successful run
    #[arg(long = "keep-workdir")]
    pub keep_workdir: bool,

    /// Print the names of all profiles and exit
    #[arg(long = "list-profiles")]
    pub list_profiles: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Debug output
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// The destination given on the command line, positional or `-o`.
    pub fn destination(&self) -> Option<&PathBuf> {
        self.output_flag.as_ref().or(self.output.as_ref())
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_and_flag_output() {
        let cli = Cli::try_parse_from(["digitize", "out/"]).expect("positional");
        assert_eq!(cli.destination(), Some(&PathBuf::from("out/")));
        let cli = Cli::try_parse_from(["digitize", "-o", "out.pdf"]).expect("flag");
        assert_eq!(cli.destination(), Some(&PathBuf::from("out.pdf")));
        assert!(Cli::try_parse_from(["digitize", "a/", "-o", "b/"]).is_err());
    }

    #[test]
    fn resolution_is_validated_while_parsing() {
        let cli = Cli::try_parse_from(["digitize", "-r", "600"]).expect("valid");
        assert_eq!(cli.resolution.map(Resolution::dpi), Some(600));
        assert!(Cli::try_parse_from(["digitize", "-r", "150"]).is_err());
        assert!(Cli::try_parse_from(["digitize", "-r", "fine"]).is_err());
    }

    #[test]
    fn verbosity_levels() {
        let cli = Cli::try_parse_from(["digitize", "--verbose"]).expect("parse");
        assert_eq!(cli.log_level(), "info");
        let cli = Cli::try_parse_from(["digitize", "-v", "--debug"]).expect("parse");
        assert_eq!(cli.log_level(), "debug");
        assert_eq!(Cli::default().log_level(), "warn");
    }
}
