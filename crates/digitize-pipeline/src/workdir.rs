// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-run working directory for page images and intermediate files.

use std::path::{Path, PathBuf};

use digitize_core::error::Result;
use tempfile::TempDir;
use tracing::{info, warn};

const PREFIX: &str = "digitize-";

/// A uniquely named directory that lives as long as one scan run.
///
/// Dropping it removes the directory; [`WorkDir::keep`] leaves it on disk.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create a fresh directory under `base`, or under the system temp dir.
    pub fn create(base: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let dir = match base {
            Some(base) => builder.tempdir_in(base)?,
            None => builder.tempdir()?,
        };
        info!(workdir = %dir.path().display(), "working directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Leave the directory and its contents in place; returns its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }

    /// Remove the directory. Failure is logged, not returned: the run's
    /// result has already been moved out by the time this is called.
    pub fn remove(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            warn!(workdir = %path.display(), error = %err, "failed to remove working directory");
        }
    }
}
