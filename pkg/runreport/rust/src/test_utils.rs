// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Scripted stand-ins for the reporter's OS-facing seams.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::ReportError;
use crate::metrics::Point;
use crate::proctable::{ProcessRecord, ProcessTable};
use crate::sink::PointSink;

/// In-memory process table holding exactly the records a test scripts.
#[derive(Debug, Default)]
pub struct FakeProcessTable {
    records: HashMap<i32, ProcessRecord>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pid: i32, command: &str, parent_pid: i32) {
        self.records.insert(
            pid,
            ProcessRecord {
                pid,
                command: command.to_string(),
                parent_pid,
            },
        );
    }

    /// Builds a straight chain: each entry is the child of the one after
    /// it, and the last entry is parented to `root_pid`.
    pub fn chain(entries: &[(i32, &str)], root_pid: i32) -> Self {
        let mut table = Self::default();
        for (idx, (pid, command)) in entries.iter().enumerate() {
            let parent_pid = entries.get(idx + 1).map_or(root_pid, |(parent, _)| *parent);
            table.insert(*pid, command, parent_pid);
        }
        table
    }
}

impl ProcessTable for FakeProcessTable {
    fn lookup(&self, pid: i32) -> Result<ProcessRecord, ReportError> {
        self.records
            .get(&pid)
            .cloned()
            .ok_or(ReportError::ProcessNotFound { pid })
    }
}

/// Sink that keeps every batch it is handed.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: RefCell<Vec<Vec<Point>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Vec<Point>> {
        self.batches.borrow().clone()
    }
}

impl PointSink for RecordingSink {
    fn submit(&self, points: &[Point]) -> anyhow::Result<()> {
        self.batches.borrow_mut().push(points.to_vec());
        Ok(())
    }
}

/// Sink that rejects every batch.
#[derive(Debug)]
pub struct FailingSink;

impl PointSink for FailingSink {
    fn submit(&self, _points: &[Point]) -> anyhow::Result<()> {
        anyhow::bail!("sink is down")
    }
}
