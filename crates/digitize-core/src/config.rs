// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan profiles: named presets stored in a nested TOML document.
//
// ```toml
// [work]
// path = "/srv/scans/work"
// keywords = ["work"]
//
// [work.invoices]
// name = "Invoice"
// ocr = true
// ```
//
// `work.invoices` inherits `path` and `keywords` from `work`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value};
use tracing::{debug, info, instrument};

use crate::error::{DigitizeError, Result};
use crate::types::{Keywords, Resolution};

/// File name searched for when no explicit profile file is given.
pub const PROFILE_FILENAME: &str = "profiles.toml";

/// Keywords may be written as `"a, b"` or `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeywordList {
    Joined(String),
    List(Vec<String>),
}

impl KeywordList {
    pub fn to_keywords(&self) -> Keywords {
        match self {
            Self::Joined(list) => Keywords::parse(list),
            Self::List(items) => items.iter().collect(),
        }
    }
}

/// Values a profile may override. Keys not listed here (including nested
/// profile tables) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileSettings {
    pub path: Option<PathBuf>,
    pub name: Option<String>,
    pub ocr: Option<bool>,
    pub keywords: Option<KeywordList>,
    pub resolution: Option<u32>,
    pub device: Option<String>,
    pub date: Option<String>,
}

impl ProfileSettings {
    /// Overlay `other` on top of `self`; values set in `other` win.
    fn merged_with(self, other: ProfileSettings) -> ProfileSettings {
        ProfileSettings {
            path: other.path.or(self.path),
            name: other.name.or(self.name),
            ocr: other.ocr.or(self.ocr),
            keywords: other.keywords.or(self.keywords),
            resolution: other.resolution.or(self.resolution),
            device: other.device.or(self.device),
            date: other.date.or(self.date),
        }
    }

    /// The profile's resolution, validated against the supported set.
    pub fn resolution(&self) -> Result<Option<Resolution>> {
        self.resolution.map(Resolution::try_from).transpose()
    }
}

/// A parsed profile document.
#[derive(Debug, Clone, Default)]
pub struct ProfileDocument {
    root: Table,
    source: Option<PathBuf>,
}

impl ProfileDocument {
    /// Parse a profile document from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let root: Table = toml::from_str(text).map_err(|err| DigitizeError::ProfileFile {
            path: PathBuf::from(PROFILE_FILENAME),
            detail: err.to_string(),
        })?;
        Ok(Self { root, source: None })
    }

    /// Load a profile document from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| DigitizeError::ProfileFile {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        let mut document = Self::parse(&text).map_err(|err| match err {
            DigitizeError::ProfileFile { detail, .. } => DigitizeError::ProfileFile {
                path: path.to_path_buf(),
                detail,
            },
            other => other,
        })?;
        document.source = Some(path.to_path_buf());
        info!(profiles = document.profile_names().len(), "profile document loaded");
        Ok(document)
    }

    /// Load from `explicit` if given, else from the first existing default location.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidates = default_locations();
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load(path),
            None => Err(DigitizeError::ProfileFile {
                path: candidates
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| PathBuf::from(PROFILE_FILENAME)),
                detail: "no profile file found".to_string(),
            }),
        }
    }

    /// Where the document was loaded from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Resolve a dotted profile name such as `work.invoices`.
    ///
    /// Settings of every table along the path are merged, deeper tables
    /// overriding their ancestors.
    pub fn lookup(&self, name: &str) -> Result<ProfileSettings> {
        let mut node = &self.root;
        let mut settings = ProfileSettings::default();
        let mut resolved: Vec<&str> = Vec::new();

        for part in name.split('.') {
            match node.get(part) {
                Some(Value::Table(child)) => {
                    settings = settings.merged_with(self.settings_of(child, name)?);
                    node = child;
                    resolved.push(part);
                }
                _ => {
                    let prefix = resolved.join(".");
                    let available = child_names(node)
                        .into_iter()
                        .map(|child| {
                            if prefix.is_empty() {
                                child
                            } else {
                                format!("{prefix}.{child}")
                            }
                        })
                        .collect();
                    return Err(DigitizeError::ProfileNotFound {
                        name: name.to_string(),
                        available,
                    });
                }
            }
        }

        debug!(profile = name, ?settings, "profile resolved");
        Ok(settings)
    }

    fn settings_of(&self, table: &Table, profile: &str) -> Result<ProfileSettings> {
        Value::Table(table.clone())
            .try_into::<ProfileSettings>()
            .map_err(|err| DigitizeError::ProfileFile {
                path: self
                    .source
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(PROFILE_FILENAME)),
                detail: format!("profile {profile}: {err}"),
            })
    }

    /// Every dotted profile name in the document, sorted.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&self.root, "", &mut names);
        names.sort();
        names
    }
}

fn child_names(table: &Table) -> Vec<String> {
    let mut names: Vec<String> = table
        .iter()
        .filter(|(_, value)| value.is_table())
        .map(|(key, _)| key.clone())
        .collect();
    names.sort();
    names
}

fn collect_names(table: &Table, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in table {
        if let Value::Table(child) = value {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            collect_names(child, &name, out);
            out.push(name);
        }
    }
}

/// `./profiles.toml`, then `$XDG_CONFIG_HOME/digitize/profiles.toml`
/// (or `~/.config/digitize/profiles.toml`).
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(PROFILE_FILENAME)];
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        locations.push(PathBuf::from(xdg).join("digitize").join(PROFILE_FILENAME));
    } else if let Ok(home) = std::env::var("HOME") {
        locations.push(
            PathBuf::from(home)
                .join(".config")
                .join("digitize")
                .join(PROFILE_FILENAME),
        );
    }
    locations
}
