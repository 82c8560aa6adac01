// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io::Write;
use std::net::TcpStream;

use anyhow::Context;
use log::debug;

use crate::metrics::Point;

/// Where assembled point batches go. The pipeline only builds batches;
/// everything about delivery lives behind this seam.
pub trait PointSink {
    fn submit(&self, points: &[Point]) -> anyhow::Result<()>;
}

/// Writes batches to the collector-side proxy as newline-terminated
/// `put <path> <timestamp> <value> <tag>=<value>...` lines over a blocking
/// TCP connection. Buffering, retries and reconnects are the proxy's job,
/// not ours.
pub struct TcpLineSink {
    address: String,
}

impl TcpLineSink {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

impl PointSink for TcpLineSink {
    fn submit(&self, points: &[Point]) -> anyhow::Result<()> {
        let mut stream = TcpStream::connect(&self.address)
            .with_context(|| format!("connecting to {}", self.address))?;
        for point in points {
            stream
                .write_all(format_line(point).as_bytes())
                .with_context(|| format!("writing to {}", self.address))?;
        }
        stream
            .flush()
            .with_context(|| format!("flushing to {}", self.address))?;
        debug!("submitted {} points to {}", points.len(), self.address);
        Ok(())
    }
}

/// Tag order follows the (sorted) tag map, so lines are reproducible.
fn format_line(point: &Point) -> String {
    let mut line = format!("put {} {} {}", point.path, point.timestamp, point.value);
    for (key, value) in &point.tags {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(value);
    }
    line.push('\n');
    line
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;
    use std::net::TcpListener;

    fn point(path: &str, value: f64) -> Point {
        Point {
            path: path.to_string(),
            value,
            timestamp: 99,
            tags: BTreeMap::new(),
        }
    }

    // -- line format --

    #[test]
    fn test_format_line_without_tags() {
        let line = format_line(&point("puppet.resources.applied", 5.0));
        assert_eq!(line, "put puppet.resources.applied 99 5\n");
    }

    #[test]
    fn test_format_line_with_tags_in_sorted_order() {
        let mut p = point("run.events.total", 0.0);
        p.tags.insert("run".to_string(), "12".to_string());
        p.tags.insert("context".to_string(), "cron".to_string());
        assert_eq!(
            format_line(&p),
            "put run.events.total 99 0 context=cron run=12\n"
        );
    }

    #[test]
    fn test_format_line_keeps_fractional_values() {
        let line = format_line(&point("run.time.total", 0.25));
        assert_eq!(line, "put run.time.total 99 0.25\n");
    }

    // -- transport --

    #[test]
    fn test_submit_writes_lines_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let reader = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = String::new();
            conn.read_to_string(&mut buf).unwrap();
            buf
        });

        let sink = TcpLineSink::new(addr.to_string());
        sink.submit(&[point("run.events.total", 3.0), point("run.time.total", 1.5)])
            .unwrap();

        // submit drops its connection on return, unblocking the reader.
        let received = reader.join().unwrap();
        assert_eq!(
            received,
            "put run.events.total 99 3\nput run.time.total 99 1.5\n"
        );
    }

    #[test]
    fn test_submit_reports_connection_failures() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = TcpLineSink::new(addr.to_string());
        let err = sink.submit(&[point("run.time.total", 1.0)]).unwrap_err();
        assert!(err.to_string().contains("connecting to"));
    }
}
