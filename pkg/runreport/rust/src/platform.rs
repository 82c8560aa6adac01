// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::ReportError;

/// OS families the reporter has an inspection recipe for. The family decides
/// the `ps` invocation form and how the ancestry root pid is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Linux,
    SolarisLike,
    BsdLike,
}

impl PlatformFamily {
    /// Maps the running OS to a family. Platforms without a recipe are
    /// rejected outright rather than guessed at.
    pub fn current() -> Result<Self, ReportError> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Result<Self, ReportError> {
        match os {
            "linux" => Ok(PlatformFamily::Linux),
            "solaris" | "illumos" => Ok(PlatformFamily::SolarisLike),
            "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "macos" => {
                Ok(PlatformFamily::BsdLike)
            }
            other => Err(ReportError::UnknownPlatform(other.to_string())),
        }
    }
}
