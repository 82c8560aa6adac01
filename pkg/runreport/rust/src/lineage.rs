// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::debug;

use crate::errors::ReportError;
use crate::proctable::{ProcessRecord, ProcessTable};

/// Upper bound on process-table lookups in one walk: the starting process
/// plus eight ancestors. A walk that runs longer is assumed to be stuck in
/// a cycle (self-parented or reparented records).
pub const MAX_HOPS: usize = 9;

/// Climbs parent links from `start_pid` until reaching the process whose
/// parent is `root_pid`, and returns that terminal ancestor.
///
/// Every hop reads the live process table, so an ancestor reaped mid-walk
/// surfaces as `ProcessNotFound`.
pub fn climb(
    table: &dyn ProcessTable,
    start_pid: i32,
    root_pid: i32,
) -> Result<ProcessRecord, ReportError> {
    let mut pid = start_pid;
    for hop in 0..MAX_HOPS {
        let record = table.lookup(pid)?;
        debug!(
            "hop {hop}: pid {} is {} (parent {})",
            record.pid, record.command, record.parent_pid
        );
        if record.parent_pid == root_pid {
            return Ok(record);
        }
        pid = record.parent_pid;
    }
    Err(ReportError::MaxDepthExceeded {
        start_pid,
        max_hops: MAX_HOPS,
    })
}
