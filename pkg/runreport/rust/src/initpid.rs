// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::process::{Command, Output};

use log::debug;

use crate::errors::ReportError;
use crate::platform::PlatformFamily;

/// Finds the pid every ancestry walk terminates against. Almost always init
/// (pid 1); inside a Solaris non-global zone the visible process tree is
/// rooted at the zone scheduler `zsched` instead, whose pid is only
/// discoverable at runtime.
pub fn resolve_root_pid(family: PlatformFamily) -> Result<i32, ReportError> {
    match family {
        PlatformFamily::Linux | PlatformFamily::BsdLike => Ok(1),
        PlatformFamily::SolarisLike => solaris_root_pid(),
    }
}

fn solaris_root_pid() -> Result<i32, ReportError> {
    let zoneadm = run_tool("zoneadm", &["list"])?;
    if !zoneadm.status.success() {
        return Err(ReportError::Configuration(format!(
            "zoneadm list exited with {}",
            zoneadm.status
        )));
    }
    if in_global_zone(&String::from_utf8_lossy(&zoneadm.stdout)) {
        return Ok(1);
    }

    debug!("non-global zone, locating zsched");
    let pgrep = run_tool("pgrep", &["-x", "zsched"])?;
    parse_pgrep_pid(&String::from_utf8_lossy(&pgrep.stdout))
}

fn run_tool(program: &str, args: &[&str]) -> Result<Output, ReportError> {
    Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ReportError::Configuration(format!("could not run {program}: {e}")))
}

/// `zoneadm list` prints the zones visible to the caller, one per line.
/// Only the global zone sees `global` in that list.
fn in_global_zone(zoneadm_output: &str) -> bool {
    zoneadm_output.lines().any(|line| line.trim() == "global")
}

fn parse_pgrep_pid(pgrep_output: &str) -> Result<i32, ReportError> {
    pgrep_output
        .lines()
        .find_map(|line| line.trim().parse::<i32>().ok())
        .ok_or_else(|| {
            ReportError::Configuration("zone scheduler process (zsched) not found".to_string())
        })
}
