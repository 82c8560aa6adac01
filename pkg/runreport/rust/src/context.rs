// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

use phf::phf_set;

/// Commands that kick off a machine's first monitored run: the
/// inetd-activated SSH listener, the bootstrap interpreter, and the SMF
/// startup daemon.
static BOOTSTRAP_COMMANDS: phf::Set<&'static str> = phf_set! {
    "sshd",
    "python",
    "svc.startd",
};

/// Why a run happened, judged from the terminal ancestor's command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContext {
    /// A human logged in and started it.
    Interactive,
    /// First run of a freshly provisioned machine.
    Bootstrapper,
    /// A cron-like scheduler started it.
    Cron,
    /// None of the known launchers; carries the raw command.
    Other(String),
}

impl RunContext {
    /// Classifies a terminal ancestor command. Rules overlap on purpose and
    /// are tried in order, first match wins: a full path ending in `/sshd`
    /// is an interactive login session even when the path mentions cron
    /// (`/opt/cron-tools/sshd`), while a bare `sshd` is the inetd-style
    /// listener a bootstrapped machine runs under.
    pub fn classify(command: &str) -> RunContext {
        if command.ends_with("/sshd") {
            return RunContext::Interactive;
        }
        if BOOTSTRAP_COMMANDS.contains(command) {
            return RunContext::Bootstrapper;
        }
        if command.contains("cron") {
            return RunContext::Cron;
        }
        RunContext::Other(command.to_string())
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunContext::Interactive => write!(f, "interactive"),
            RunContext::Bootstrapper => write!(f, "bootstrapper"),
            RunContext::Cron => write!(f, "cron"),
            RunContext::Other(command) => write!(f, "{command}"),
        }
    }
}
