// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// digitize: scan, merge, OCR and file paper documents.
//
// Entry point. Parses arguments, initialises logging, resolves the scan request
// and runs the pipeline against the real external tools.

mod cli;
mod resolve;

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use digitize_core::config::ProfileDocument;
use digitize_core::error::{DigitizeError, Result};
use digitize_core::human_errors::humanize_error;
use digitize_pipeline::{ScanPipeline, SystemTools};
use tracing::{debug, warn};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(?cli, "command line parsed");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            if err.is_user_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.list_profiles {
        let document = ProfileDocument::discover(cli.config.as_deref())?;
        for name in document.profile_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let started = Local::now();
    let profile = resolve::profile_settings(cli)?;
    let request = resolve::build_request(cli, &profile, started)?;

    if resolve::ignored_keywords(&request) {
        warn!(keywords = %request.keywords, "keywords are only attached by the OCR step; ignoring them");
    }

    let pipeline = ScanPipeline::new(SystemTools).with_progress(|stage| println!("{stage}"));
    let report = pipeline.run(&request)?;

    if let Some(kept) = &report.workdir_kept {
        println!("Intermediate files kept in {}", kept.display());
    }
    println!("Done: {} ({} pages)", report.output.display(), report.pages);
    Ok(())
}

fn report(err: &DigitizeError) {
    debug!(error = ?err, "run failed");
    let human = humanize_error(err);
    eprintln!("error: {}", human.message);
    eprintln!("hint: {}", human.suggestion);
}
