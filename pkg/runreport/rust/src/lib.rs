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

pub mod cli;
pub mod config;
mod context;
mod counter;
mod errors;
mod initpid;
mod lineage;
mod metrics;
mod pipeline;
mod platform;
mod proctable;
mod sink;
mod tags;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export the public API
pub use context::RunContext;
pub use counter::RunCounter;
pub use errors::ReportError;
pub use initpid::resolve_root_pid;
pub use lineage::{MAX_HOPS, climb};
pub use metrics::{
    MetricCategory, MetricValue, Point, RunMetrics, RunReport, capture_timestamp, flatten,
};
pub use pipeline::{ReportPipeline, RunSummary};
pub use platform::PlatformFamily;
pub use proctable::{ProcessRecord, ProcessTable, PsProcessTable};
pub use sink::{PointSink, TcpLineSink};
pub use tags::{TagName, TagSources, compute_tags};
