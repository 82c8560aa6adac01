// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::tags::TagName;

const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/run-reporter.yaml";

fn default_proxy_address() -> String {
    "127.0.0.1:4242".to_string()
}

fn default_path_prefix() -> String {
    "run".to_string()
}

fn default_tags() -> Vec<TagName> {
    vec![TagName::Context, TagName::Run]
}

fn default_state_file() -> PathBuf {
    PathBuf::from("/opt/datadog-agent/run/run-reporter.count")
}

#[derive(Debug, Deserialize)]
pub struct ReporterConfig {
    /// Collector-side proxy the point batch is written to.
    #[serde(default = "default_proxy_address")]
    pub proxy_address: String,
    /// Leading path segment of every submitted point.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// Tags attached to every point of a batch.
    #[serde(default = "default_tags")]
    pub tags: Vec<TagName>,
    /// Run counter state file.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Checkout the `revision` tag is read from. Required only when that
    /// tag is enabled.
    pub code_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            proxy_address: default_proxy_address(),
            path_prefix: default_path_prefix(),
            tags: default_tags(),
            state_file: default_state_file(),
            code_dir: None,
            log_level: None,
        }
    }
}

/// Loads the reporter config. A missing file is fine (defaults and
/// environment variables apply); an unparseable one is an error.
pub fn load(config_path: Option<PathBuf>) -> Result<ReporterConfig> {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?
    } else {
        warn!(
            "Config file not found at {}. Using defaults and environment variables.",
            path.display()
        );
        ReporterConfig::default()
    };

    // Environment beats the file.
    if let Ok(address) = env::var("DD_RUN_REPORTER_PROXY_ADDRESS") {
        config.proxy_address = address;
    }

    Ok(config)
}

/// Gets the log level from configuration.
/// Priority: DD_LOG_LEVEL > LOG_LEVEL > config file > default Info
pub fn get_log_level(config: &ReporterConfig) -> log::Level {
    if let Ok(level) = env::var("DD_LOG_LEVEL") {
        return parse_log_level(&level);
    }

    if let Ok(level) = env::var("LOG_LEVEL") {
        return parse_log_level(&level);
    }

    config
        .log_level
        .as_deref()
        .map(parse_log_level)
        .unwrap_or(log::Level::Info)
}

/// Parse an agent log level string into a log::Level.
/// Unknown levels silently default to Info.
fn parse_log_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" | "warning" => log::Level::Warn,
        "error" | "critical" => log::Level::Error,
        "off" => log::Level::Error, // log crate has no "off", use Error as minimal logging
        _ => log::Level::Info,
    }
}
