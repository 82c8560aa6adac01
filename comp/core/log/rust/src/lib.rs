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

//! Minimal stdio logger shared by the agent Rust components.
//!
//! Records at INFO and below go to stdout, WARN and ERROR go to stderr, so
//! supervisors can split operational chatter from actionable failures
//! without parsing the line body.

use std::fmt::Arguments;
use std::io::Write;

use log::{Level, Log, Metadata, Record, SetLoggerError};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

struct SimpleLogger {
    level: Level,
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.args());
        // A closed pipe is not something the logger can fix; drop the line
        // rather than panic.
        if record.level() <= Level::Warn {
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        } else {
            let _ = writeln!(std::io::stdout().lock(), "{line}");
        }
    }

    fn flush(&self) {}
}

fn format_line(level: Level, args: &Arguments<'_>) -> String {
    let ts = OffsetDateTime::now_utc()
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| String::from("0000-00-00 00:00:00"));
    format!("{ts} UTC | {level} | {args}")
}

/// Installs the logger with `Info` as the most verbose level emitted.
pub fn init() -> Result<(), SetLoggerError> {
    init_with_level(Level::Info)
}

/// Installs the logger. Records above `level` are discarded.
pub fn init_with_level(level: Level) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(SimpleLogger { level }))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
