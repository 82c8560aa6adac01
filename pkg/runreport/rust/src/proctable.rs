// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::process::Command;

use log::debug;

use crate::errors::ReportError;
use crate::platform::PlatformFamily;

/// A process table entry at one instant. Records are looked up fresh for
/// every hop of an ancestry walk and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: i32,
    /// Executable as recorded by the process table. Depending on the
    /// platform this is a bare name (`sshd`) or a full path
    /// (`/usr/sbin/sshd`).
    pub command: String,
    pub parent_pid: i32,
}

/// Read access to the OS process table, one pid at a time.
pub trait ProcessTable {
    fn lookup(&self, pid: i32) -> Result<ProcessRecord, ReportError>;
}

/// Process table backed by the system `ps` binary.
pub struct PsProcessTable {
    family: PlatformFamily,
}

impl PsProcessTable {
    pub fn new(family: PlatformFamily) -> Self {
        Self { family }
    }
}

impl ProcessTable for PsProcessTable {
    fn lookup(&self, pid: i32) -> Result<ProcessRecord, ReportError> {
        let mut cmd = Command::new("ps");
        match self.family {
            PlatformFamily::Linux => {
                cmd.args(["--no-headers", "-o", "comm,ppid", "-p"]);
            }
            PlatformFamily::SolarisLike | PlatformFamily::BsdLike => {
                cmd.args(["-o", "comm=", "-o", "ppid=", "-p"]);
            }
        }
        cmd.arg(pid.to_string());

        let output = cmd
            .output()
            .map_err(|e| ReportError::Configuration(format!("could not run ps: {e}")))?;
        if !output.status.success() {
            debug!("ps exited with {} for pid {pid}", output.status);
        }
        parse_ps_row(pid, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses a `<command> <ppid>` row. The command may itself contain spaces,
/// so the row is split from the right: the last field is the parent pid,
/// everything before it the command.
fn parse_ps_row(pid: i32, raw: &str) -> Result<ProcessRecord, ReportError> {
    let row = raw.lines().next().unwrap_or("").trim();
    let Some((command, ppid)) = row.rsplit_once(char::is_whitespace) else {
        // Covers empty output (pid already reaped) and rows with no ppid
        // column: either way the table gave us nothing usable.
        return Err(ReportError::ProcessNotFound { pid });
    };
    let Ok(parent_pid) = ppid.parse::<i32>() else {
        return Err(ReportError::ProcessNotFound { pid });
    };
    Ok(ProcessRecord {
        pid,
        command: command.trim_end().to_string(),
        parent_pid,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- row parsing --

    #[test]
    fn test_parse_plain_row() {
        let rec = parse_ps_row(42, "sshd              1\n").unwrap();
        assert_eq!(rec.pid, 42);
        assert_eq!(rec.command, "sshd");
        assert_eq!(rec.parent_pid, 1);
    }

    #[test]
    fn test_parse_full_path_command() {
        let rec = parse_ps_row(7, "/usr/lib/ssh/sshd    1234\n").unwrap();
        assert_eq!(rec.command, "/usr/lib/ssh/sshd");
        assert_eq!(rec.parent_pid, 1234);
    }

    #[test]
    fn test_parse_command_with_spaces() {
        let rec = parse_ps_row(9, "tuned: daemon worker  550\n").unwrap();
        assert_eq!(rec.command, "tuned: daemon worker");
        assert_eq!(rec.parent_pid, 550);
    }

    #[test]
    fn test_empty_output_means_process_not_found() {
        let err = parse_ps_row(12345, "").unwrap_err();
        assert!(matches!(err, ReportError::ProcessNotFound { pid: 12345 }));
    }

    #[test]
    fn test_row_without_ppid_means_process_not_found() {
        let err = parse_ps_row(3, "lonesome\n").unwrap_err();
        assert!(matches!(err, ReportError::ProcessNotFound { pid: 3 }));
    }

    #[test]
    fn test_non_numeric_ppid_means_process_not_found() {
        let err = parse_ps_row(3, "cmd notapid\n").unwrap_err();
        assert!(matches!(err, ReportError::ProcessNotFound { pid: 3 }));
    }

    #[test]
    fn test_only_first_row_is_read() {
        let rec = parse_ps_row(5, "init  0\nghost  99\n").unwrap();
        assert_eq!(rec.command, "init");
        assert_eq!(rec.parent_pid, 0);
    }
}
