// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "dd-run-reporter",
    about = "Classifies why a monitored run happened and submits its metrics"
)]
pub struct Args {
    /// Run report file (YAML, or JSON).
    pub report: PathBuf,

    /// Reporter config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Assemble the point batch and print it as JSON instead of submitting.
    /// The run counter is left untouched.
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path_is_required() {
        assert!(Args::try_parse_from(["dd-run-reporter"]).is_err());
    }

    #[test]
    fn test_minimal_invocation() {
        let args =
            Args::try_parse_from(["dd-run-reporter", "/var/lib/puppet/last_run_report.yaml"])
                .unwrap();
        assert_eq!(
            args.report,
            PathBuf::from("/var/lib/puppet/last_run_report.yaml")
        );
        assert!(args.config.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "dd-run-reporter",
            "--config",
            "/etc/datadog-agent/run-reporter.yaml",
            "--dry-run",
            "report.yaml",
        ])
        .unwrap();
        assert_eq!(
            args.config,
            Some(PathBuf::from("/etc/datadog-agent/run-reporter.yaml"))
        );
        assert!(args.dry_run);
        assert_eq!(args.report, PathBuf::from("report.yaml"));
    }

    #[test]
    fn test_short_config_flag() {
        let args =
            Args::try_parse_from(["dd-run-reporter", "-c", "cfg.yaml", "report.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("cfg.yaml")));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["dd-run-reporter", "--verbose", "r.yaml"]).is_err());
    }
}
