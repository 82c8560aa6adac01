// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Run report parsing and flattening.
//!
//! A report nests metrics two levels deep (category, then named entries
//! holding a `[label, description, value]` triple). Submission wants flat
//! `prefix.category.label` paths instead, one point per entry, all stamped
//! with the same capture time. Document order is preserved end to end so
//! batches come out stable and diffable.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A run report as produced by the monitored tool.
#[derive(Debug, Deserialize)]
pub struct RunReport {
    pub metrics: RunMetrics,
}

impl RunReport {
    /// Reads a report from a YAML file. JSON reports parse through the same
    /// path, JSON being a YAML subset.
    pub fn from_file(path: &Path) -> anyhow::Result<RunReport> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read report file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("could not parse report file {}", path.display()))
    }
}

/// Nested run metrics in document order.
#[derive(Debug, Default)]
pub struct RunMetrics {
    pub categories: Vec<MetricCategory>,
}

#[derive(Debug)]
pub struct MetricCategory {
    pub name: String,
    pub values: Vec<MetricValue>,
}

/// One metric entry: its key under the category plus the
/// `[label, description, value]` triple stored there.
#[derive(Debug)]
pub struct MetricValue {
    pub name: String,
    pub label: String,
    pub description: String,
    pub value: f64,
}

impl<'de> Deserialize<'de> for RunMetrics {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MetricsVisitor;

        impl<'de> Visitor<'de> for MetricsVisitor {
            type Value = RunMetrics;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of metric categories")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, entries)) = access.next_entry::<String, CategoryEntries>()? {
                    categories.push(MetricCategory {
                        name,
                        values: entries.0,
                    });
                }
                Ok(RunMetrics { categories })
            }
        }

        deserializer.deserialize_map(MetricsVisitor)
    }
}

// Plain derive would collect into a map and lose document order, so the
// inner level gets the same visitor treatment as the outer.
struct CategoryEntries(Vec<MetricValue>);

impl<'de> Deserialize<'de> for CategoryEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CategoryEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of metric names to [label, description, value] triples")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, (label, description, value))) =
                    access.next_entry::<String, (String, String, f64)>()?
                {
                    values.push(MetricValue {
                        name,
                        label,
                        description,
                        value,
                    });
                }
                Ok(CategoryEntries(values))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// One flattened sample, ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub path: String,
    pub value: f64,
    pub timestamp: i64,
    pub tags: BTreeMap<String, String>,
}

/// Flattens nested metrics into one point per entry. Paths are
/// `<prefix>.<category>.<label>` and every point shares `timestamp`. Values
/// pass through untouched; tags stay empty here, the pipeline attaches one
/// batch-wide set.
pub fn flatten(metrics: &RunMetrics, path_prefix: &str, timestamp: i64) -> Vec<Point> {
    let mut points = Vec::new();
    for category in &metrics.categories {
        for entry in &category.values {
            points.push(Point {
                path: format!("{path_prefix}.{}.{}", category.name, entry.label),
                value: entry.value,
                timestamp,
                tags: BTreeMap::new(),
            });
        }
    }
    points
}

/// Current unix time, captured once per batch.
pub fn capture_timestamp() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
