// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

//! Invoked by a monitored tool right after it finishes a run, with the run
//! report as its argument. Figures out why the run happened from its own
//! process ancestry, flattens the report's metrics and ships them to the
//! collector-side proxy as one tagged batch, then bumps the durable run
//! counter.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use dd_run_report::cli::Args;
use dd_run_report::{
    PlatformFamily, PsProcessTable, ReportPipeline, RunReport, TcpLineSink, config,
    resolve_root_pid,
};

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = config::load(args.config.clone())?;
    simple_logger::init_with_level(config::get_log_level(&cfg))?;
    debug!("loaded config: {cfg:?}");

    let family = PlatformFamily::current()?;
    let root_pid = resolve_root_pid(family)?;
    let start_pid = i32::try_from(std::process::id())
        .context("reporter pid does not fit a process table pid")?;
    debug!("platform {family:?}, ancestry root {root_pid}, starting at {start_pid}");

    let report = RunReport::from_file(&args.report)?;

    let table = PsProcessTable::new(family);
    let sink = TcpLineSink::new(cfg.proxy_address.clone());
    let pipeline = ReportPipeline::new(&cfg, &table, &sink, start_pid, root_pid);

    if args.dry_run {
        let points = pipeline.assemble(&report)?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &points).context("writing dry-run batch")?;
        writeln!(out).context("writing dry-run batch")?;
        info!("dry run: assembled {} points, nothing submitted", points.len());
        return Ok(());
    }

    let summary = pipeline.run(&report)?;
    info!(
        "run {}: {} points submitted to {}",
        summary.run_number, summary.points_submitted, cfg.proxy_address
    );
    Ok(())
}
