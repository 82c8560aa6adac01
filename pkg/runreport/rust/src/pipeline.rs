// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::{debug, info};

use crate::config::ReporterConfig;
use crate::counter::RunCounter;
use crate::errors::ReportError;
use crate::metrics::{self, Point, RunReport};
use crate::proctable::ProcessTable;
use crate::sink::PointSink;
use crate::tags::{self, TagSources};

/// Orchestrates one reporting run: tags, flattening, submission, counter.
/// The process table and sink are injected so hosts and tests choose their
/// own.
pub struct ReportPipeline<'a> {
    config: &'a ReporterConfig,
    table: &'a dyn ProcessTable,
    sink: &'a dyn PointSink,
    counter: RunCounter,
    start_pid: i32,
    root_pid: i32,
}

/// What a completed run did, for the caller's logs.
#[derive(Debug)]
pub struct RunSummary {
    pub run_number: u64,
    pub points_submitted: usize,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(
        config: &'a ReporterConfig,
        table: &'a dyn ProcessTable,
        sink: &'a dyn PointSink,
        start_pid: i32,
        root_pid: i32,
    ) -> Self {
        Self {
            config,
            table,
            sink,
            counter: RunCounter::new(config.state_file.clone()),
            start_pid,
            root_pid,
        }
    }

    /// Builds the tagged point batch for `report` without submitting it.
    /// Tags come first: a lineage walk that cannot finish aborts the run
    /// before any point exists. The whole batch shares one capture
    /// timestamp and one tag set.
    pub fn assemble(&self, report: &RunReport) -> Result<Vec<Point>, ReportError> {
        let tags = tags::compute_tags(
            &self.config.tags,
            &TagSources {
                table: self.table,
                start_pid: self.start_pid,
                root_pid: self.root_pid,
                counter: &self.counter,
                code_dir: self.config.code_dir.as_deref(),
            },
        )?;
        let timestamp = metrics::capture_timestamp();
        let mut points = metrics::flatten(&report.metrics, &self.config.path_prefix, timestamp);
        for point in &mut points {
            point.tags = tags.clone();
        }
        debug!("assembled {} points, {} tags", points.len(), tags.len());
        Ok(points)
    }

    /// Runs the whole pipeline. The counter only advances after the sink
    /// accepted the batch, so a failed submission repeats the same run
    /// number next time (runs are counted at least once, never lost).
    pub fn run(&self, report: &RunReport) -> Result<RunSummary, ReportError> {
        let run_number = self.counter.current()?;
        let points = self.assemble(report)?;
        self.sink
            .submit(&points)
            .map_err(|source| ReportError::Submission {
                endpoint: self.config.proxy_address.clone(),
                source,
            })?;
        self.counter.advance()?;
        info!("run {run_number}: submitted {} point(s)", points.len());
        Ok(RunSummary {
            run_number,
            points_submitted: points.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tags::TagName;
    use crate::test_utils::{FailingSink, FakeProcessTable, RecordingSink};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(state_dir: &Path) -> ReporterConfig {
        ReporterConfig {
            path_prefix: "puppet".to_string(),
            state_file: state_dir.join("run.count"),
            ..ReporterConfig::default()
        }
    }

    fn report() -> RunReport {
        serde_yaml::from_str("metrics:\n  catalog:\n    changed: [n, Changed resources, 0]\n")
            .unwrap()
    }

    #[test]
    fn test_run_submits_tagged_points_and_advances() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let table = FakeProcessTable::chain(&[(400, "run"), (300, "sshd")], 1);
        let sink = RecordingSink::new();

        let pipeline = ReportPipeline::new(&cfg, &table, &sink, 400, 1);
        let summary = pipeline.run(&report()).unwrap();

        assert_eq!(summary.run_number, 1);
        assert_eq!(summary.points_submitted, 1);

        let batches = sink.batches();
        assert_eq!(batches.len(), 1);
        let point = &batches[0][0];
        assert_eq!(point.path, "puppet.catalog.n");
        assert_eq!(point.value, 0.0);
        assert_eq!(point.tags.get("context").map(String::as_str), Some("bootstrapper"));
        assert_eq!(point.tags.get("run").map(String::as_str), Some("1"));

        // State decodes to the follow-up run number.
        assert_eq!(fs::read_to_string(cfg.state_file).unwrap().trim(), "2");
    }

    #[test]
    fn test_failed_submission_leaves_the_counter_alone() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let table = FakeProcessTable::chain(&[(400, "run"), (300, "/usr/sbin/cron")], 1);

        let pipeline = ReportPipeline::new(&cfg, &table, &FailingSink, 400, 1);
        let err = pipeline.run(&report()).unwrap_err();

        assert!(matches!(err, ReportError::Submission { .. }));
        assert!(!cfg.state_file.exists(), "counter must not advance");
    }

    #[test]
    fn test_lineage_failure_aborts_before_submission() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let table = FakeProcessTable::new();
        let sink = RecordingSink::new();

        let pipeline = ReportPipeline::new(&cfg, &table, &sink, 400, 1);
        let err = pipeline.run(&report()).unwrap_err();

        assert!(matches!(err, ReportError::ProcessNotFound { pid: 400 }));
        assert!(sink.batches().is_empty(), "nothing may reach the sink");
        assert!(!cfg.state_file.exists());
    }

    #[test]
    fn test_unreadable_state_aborts_the_run() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        fs::write(&cfg.state_file, "garbage\n").unwrap();
        let table = FakeProcessTable::chain(&[(400, "run"), (300, "sshd")], 1);
        let sink = RecordingSink::new();

        let pipeline = ReportPipeline::new(&cfg, &table, &sink, 400, 1);
        let err = pipeline.run(&report()).unwrap_err();

        assert!(matches!(err, ReportError::StateRead { .. }));
        assert!(sink.batches().is_empty());
    }

    #[test]
    fn test_assemble_tags_every_point_identically() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let table = FakeProcessTable::chain(&[(400, "run"), (300, "crond")], 1);
        let sink = RecordingSink::new();
        let pipeline = ReportPipeline::new(&cfg, &table, &sink, 400, 1);

        let report: RunReport = serde_yaml::from_str(
            "metrics:\n  time:\n    total: [total, Total time, 2.5]\n  events:\n    failure: [failure, Failed events, 0]\n    success: [success, Successful events, 3]\n",
        )
        .unwrap();
        let points = pipeline.assemble(&report).unwrap();

        assert_eq!(points.len(), 3);
        let first_tags = &points[0].tags;
        assert_eq!(first_tags.get("context").map(String::as_str), Some("cron"));
        assert!(points.iter().all(|p| &p.tags == first_tags));
        assert!(points.iter().all(|p| p.timestamp == points[0].timestamp));
        // Assembly alone must not touch durable state.
        assert!(!cfg.state_file.exists());
    }

    #[test]
    fn test_run_with_no_tags_enabled() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(dir.path());
        cfg.tags = Vec::new();
        let table = FakeProcessTable::new();
        let sink = RecordingSink::new();

        let pipeline = ReportPipeline::new(&cfg, &table, &sink, 400, 1);
        let summary = pipeline.run(&report()).unwrap();

        assert_eq!(summary.points_submitted, 1);
        assert!(sink.batches()[0][0].tags.is_empty());
    }

    #[test]
    fn test_run_numbers_repeat_until_a_submission_sticks() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let table = FakeProcessTable::chain(&[(400, "run"), (300, "sshd")], 1);

        let failing = ReportPipeline::new(&cfg, &table, &FailingSink, 400, 1);
        assert!(failing.run(&report()).is_err());
        assert!(failing.run(&report()).is_err());

        let sink = RecordingSink::new();
        let pipeline = ReportPipeline::new(&cfg, &table, &sink, 400, 1);
        let summary = pipeline.run(&report()).unwrap();
        // Both failed attempts reported run 1; so does the one that stuck.
        assert_eq!(summary.run_number, 1);
        assert_eq!(fs::read_to_string(cfg.state_file).unwrap().trim(), "2");
    }
}
