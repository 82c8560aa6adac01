// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of a reporting run. Any of these aborts the whole run;
/// there is no partial success.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported platform: {0}")]
    UnknownPlatform(String),

    #[error("no process table entry for pid {pid}")]
    ProcessNotFound { pid: i32 },

    #[error("ancestry of pid {start_pid} did not reach the root within {max_hops} hops")]
    MaxDepthExceeded { start_pid: i32, max_hops: usize },

    #[error("could not read run state from {path}: {reason}")]
    StateRead { path: PathBuf, reason: String },

    #[error("could not submit points to {endpoint}")]
    Submission {
        endpoint: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),
}
