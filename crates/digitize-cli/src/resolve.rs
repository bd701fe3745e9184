// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge built-in defaults, the selected profile and explicit flags into one
// immutable `ScanRequest`. Later layers win.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use digitize_core::config::{KeywordList, ProfileDocument, ProfileSettings};
use digitize_core::error::Result;
use digitize_core::naming;
use digitize_core::types::{DEFAULT_DEVICE, Keywords, ScanRequest};
use tracing::debug;

use crate::cli::Cli;

/// Settings of the profile named with `-p`, or empty settings.
pub fn profile_settings(cli: &Cli) -> Result<ProfileSettings> {
    match &cli.profile {
        Some(name) => ProfileDocument::discover(cli.config.as_deref())?.lookup(name),
        None => Ok(ProfileSettings::default()),
    }
}

/// Build the request for this run; `started` stamps synthesized filenames.
pub fn build_request(
    cli: &Cli,
    profile: &ProfileSettings,
    started: DateTime<Local>,
) -> Result<ScanRequest> {
    let resolution = match cli.resolution {
        Some(resolution) => resolution,
        None => profile.resolution()?.unwrap_or_default(),
    };

    let stamp = match cli.date.as_deref().or(profile.date.as_deref()) {
        Some(date) => naming::date_override(date)?,
        None => naming::timestamp(started),
    };

    let destination = cli
        .destination()
        .or(profile.path.as_ref())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let name = cli.name.as_deref().or(profile.name.as_deref());
    let output = naming::resolve_output_path(&destination, &stamp, name)?;

    let keywords = match &cli.keywords {
        Some(list) => Keywords::parse(list),
        None => profile
            .keywords
            .as_ref()
            .map(KeywordList::to_keywords)
            .unwrap_or_default(),
    };

    let mut request = ScanRequest::new(output);
    request.resolution = resolution;
    request.device = cli
        .device
        .clone()
        .or_else(|| profile.device.clone())
        .unwrap_or_else(|| DEFAULT_DEVICE.to_string());
    request.keywords = keywords;
    request.skip_ocr = cli.skip_ocr || profile.ocr == Some(false);
    request.expected_pages = cli.pages;
    request.keep_workdir = cli.keep_workdir;

    debug!(?request, "scan request resolved");
    Ok(request)
}

/// Whether `request` carries keywords that no step will attach, because OCR is
/// skipped. Keywords from a profile count as much as keywords from `-k`.
pub fn ignored_keywords(request: &ScanRequest) -> bool {
    request.skip_ocr && !request.keywords.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;
    use digitize_core::error::DigitizeError;

    fn started() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, 31, 14, 25, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("digitize").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_without_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().to_string_lossy().into_owned();
        let request = build_request(&parse(&[&dest]), &ProfileSettings::default(), started())
            .expect("request");

        assert_eq!(request.resolution.dpi(), 300);
        assert_eq!(request.device, "brother4:net1;dev0");
        assert_eq!(request.output, dir.path().join("20240131-142500.pdf"));
        assert!(!request.skip_ocr);
        assert!(request.keywords.is_empty());
    }

    #[test]
    fn name_and_date_shape_the_filename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().to_string_lossy().into_owned();
        let cli = parse(&[&dest, "-n", "My Document", "-t", "2020-01-02"]);
        let request = build_request(&cli, &ProfileSettings::default(), started()).expect("request");
        assert_eq!(request.output, dir.path().join("20200102-my-document.pdf"));
    }

    #[test]
    fn profile_values_apply_when_flags_are_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = ProfileSettings {
            path: Some(dir.path().to_path_buf()),
            name: Some("Invoice".into()),
            ocr: Some(false),
            keywords: Some(KeywordList::List(vec!["tax".into(), "2024".into()])),
            resolution: Some(600),
            device: Some("epson:usb".into()),
            date: None,
        };
        let request = build_request(&parse(&[]), &profile, started()).expect("request");

        assert_eq!(request.output, dir.path().join("20240131-142500-invoice.pdf"));
        assert_eq!(request.resolution.dpi(), 600);
        assert_eq!(request.device, "epson:usb");
        assert!(request.skip_ocr);
        assert_eq!(request.keywords.joined(), "tax,2024");
    }

    #[test]
    fn flags_override_profile() {
        let profile_dir = tempfile::tempdir().expect("profile dir");
        let flag_dir = tempfile::tempdir().expect("flag dir");
        let profile = ProfileSettings {
            path: Some(profile_dir.path().to_path_buf()),
            name: Some("Invoice".into()),
            keywords: Some(KeywordList::Joined("tax".into())),
            resolution: Some(600),
            ..ProfileSettings::default()
        };
        let dest = flag_dir.path().to_string_lossy().into_owned();
        let cli = parse(&["-o", &dest, "-n", "Letter", "-k", "private", "-r", "200"]);
        let request = build_request(&cli, &profile, started()).expect("request");

        assert_eq!(request.output, flag_dir.path().join("20240131-142500-letter.pdf"));
        assert_eq!(request.resolution.dpi(), 200);
        assert_eq!(request.keywords.joined(), "private");
    }

    #[test]
    fn skip_flag_wins_over_profile_ocr() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().to_string_lossy().into_owned();
        let profile = ProfileSettings {
            ocr: Some(true),
            ..ProfileSettings::default()
        };
        let request = build_request(&parse(&[&dest, "--skip-ocr"]), &profile, started())
            .expect("request");
        assert!(request.skip_ocr);
    }

    #[test]
    fn invalid_profile_resolution_is_rejected() {
        let profile = ProfileSettings {
            resolution: Some(150),
            ..ProfileSettings::default()
        };
        let err = build_request(&parse(&[]), &profile, started()).expect_err("150 dpi");
        assert!(matches!(err, DigitizeError::InvalidResolution { .. }));
    }

    #[test]
    fn missing_output_directory_is_rejected() {
        let err = build_request(
            &parse(&["/nonexistent-dir/out.pdf"]),
            &ProfileSettings::default(),
            started(),
        )
        .expect_err("parent missing");
        assert!(matches!(err, DigitizeError::OutputDirectoryMissing(_)));
    }

    #[test]
    fn profile_lookup_uses_explicit_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("profiles.toml");
        std::fs::write(&config, "[work]\nname = \"Work\"\n\n[work.invoices]\nocr = false\n")
            .expect("write profiles");
        let config = config.to_string_lossy().into_owned();

        let settings = profile_settings(&parse(&["--config", &config, "-p", "work.invoices"]))
            .expect("profile");
        assert_eq!(settings.name.as_deref(), Some("Work"));
        assert_eq!(settings.ocr, Some(false));

        let err = profile_settings(&parse(&["--config", &config, "-p", "home"]))
            .expect_err("absent");
        assert!(err.to_string().contains("profile not found"));
    }

    #[test]
    fn profile_keywords_are_ignored_when_profile_disables_ocr() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = ProfileSettings {
            path: Some(dir.path().to_path_buf()),
            ocr: Some(false),
            keywords: Some(KeywordList::Joined("tax".into())),
            ..ProfileSettings::default()
        };
        let request = build_request(&parse(&[]), &profile, started()).expect("request");
        assert!(ignored_keywords(&request));

        let request = build_request(&parse(&["--skip-ocr"]), &ProfileSettings::default(), started())
            .expect("request");
        assert!(!ignored_keywords(&request));

        let with_ocr = ProfileSettings {
            ocr: Some(true),
            ..profile
        };
        let request = build_request(&parse(&[]), &with_ocr, started()).expect("request");
        assert!(!ignored_keywords(&request));
    }
}
