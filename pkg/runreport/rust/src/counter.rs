// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::PathBuf;

use log::debug;

use crate::errors::ReportError;

/// Durable run counter backed by a plain text file.
///
/// The file holds nothing but the current run number. It is read without
/// locking and overwritten in place: invocations are expected to be
/// serialized per host, and a concurrent reader observing a duplicate run
/// number is an accepted failure mode. A torn write surfaces as `StateRead`
/// on the next run rather than a silent reset.
pub struct RunCounter {
    path: PathBuf,
}

impl RunCounter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The number of the run in progress. A missing state file means this
    /// is the first run ever; a file that exists but cannot be read or
    /// parsed is an error.
    pub fn current(&self) -> Result<u64, ReportError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(1),
            Err(err) => {
                return Err(ReportError::StateRead {
                    path: self.path.clone(),
                    reason: err.to_string(),
                });
            }
        };
        raw.trim().parse::<u64>().map_err(|_| ReportError::StateRead {
            path: self.path.clone(),
            reason: format!("not a run number: {:?}", raw.trim()),
        })
    }

    /// Persists the successor of the current run number, creating parent
    /// directories as needed.
    pub fn advance(&self) -> Result<(), ReportError> {
        let next = self.current()? + 1;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            DirBuilder::new()
                .recursive(true)
                .mode(0o755)
                .create(parent)
                .map_err(|err| ReportError::StateRead {
                    path: self.path.clone(),
                    reason: format!("could not create state directory: {err}"),
                })?;
        }
        fs::write(&self.path, format!("{next}\n")).map_err(|err| ReportError::StateRead {
            path: self.path.clone(),
            reason: format!("could not persist run number: {err}"),
        })?;
        debug!("run state advanced to {next} at {}", self.path.display());
        Ok(())
    }
}
