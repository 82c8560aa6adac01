// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::context::RunContext;
use crate::counter::RunCounter;
use crate::errors::ReportError;
use crate::lineage;
use crate::proctable::ProcessTable;

/// Tags the reporter knows how to compute. The config file enables a
/// subset; anything else in its `tags` list is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagName {
    Context,
    Run,
    Revision,
    Hostname,
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagName::Context => write!(f, "context"),
            TagName::Run => write!(f, "run"),
            TagName::Revision => write!(f, "revision"),
            TagName::Hostname => write!(f, "hostname"),
        }
    }
}

/// Everything tag computation may need to consult.
pub struct TagSources<'a> {
    pub table: &'a dyn ProcessTable,
    pub start_pid: i32,
    pub root_pid: i32,
    pub counter: &'a RunCounter,
    pub code_dir: Option<&'a Path>,
}

/// Computes the enabled tags. All-or-nothing: any failure (a lineage walk
/// that cannot finish, unusable run state, a missing revision) aborts the
/// run rather than submitting a partially tagged batch.
pub fn compute_tags(
    enabled: &[TagName],
    sources: &TagSources<'_>,
) -> Result<BTreeMap<String, String>, ReportError> {
    let mut tags = BTreeMap::new();
    for tag in enabled {
        let value = match tag {
            TagName::Context => {
                let ancestor =
                    lineage::climb(sources.table, sources.start_pid, sources.root_pid)?;
                RunContext::classify(&ancestor.command).to_string()
            }
            TagName::Run => sources.counter.current()?.to_string(),
            TagName::Revision => git_revision(sources.code_dir)?,
            TagName::Hostname => system_hostname()?,
        };
        tags.insert(tag.to_string(), value);
    }
    Ok(tags)
}

fn git_revision(code_dir: Option<&Path>) -> Result<String, ReportError> {
    let Some(dir) = code_dir else {
        return Err(ReportError::Configuration(
            "revision tag enabled but code_dir is not set".to_string(),
        ));
    };
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(dir)
        .output()
        .map_err(|e| ReportError::Configuration(format!("could not run git: {e}")))?;
    if !output.status.success() {
        return Err(ReportError::Configuration(format!(
            "git rev-parse failed in {}: {}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if revision.is_empty() {
        return Err(ReportError::Configuration(format!(
            "git rev-parse produced no revision in {}",
            dir.display()
        )));
    }
    Ok(revision)
}

fn system_hostname() -> Result<String, ReportError> {
    let name = nix::unistd::gethostname()
        .map_err(|e| ReportError::Configuration(format!("could not read hostname: {e}")))?;
    name.into_string()
        .map_err(|_| ReportError::Configuration("hostname is not valid UTF-8".to_string()))
}
