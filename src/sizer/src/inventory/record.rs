use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// One CMDB row. Numeric columns tolerate blank cells and read as zero; the
/// database instance count stays a string because the workload check is
/// string-level, not numeric.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "Node Name", default)]
    pub node_name: String,

    #[serde(rename = "CPU", default, deserialize_with = "blank_as_zero")]
    pub cpu: f64,

    #[serde(rename = "Peak CPU Load", default, deserialize_with = "blank_as_zero")]
    pub peak_cpu_load: f64,

    #[serde(rename = "Mem (MB)", default, deserialize_with = "blank_as_zero")]
    pub mem_provisioned_mb: f64,

    #[serde(rename = "Peak Mem Used", default, deserialize_with = "blank_as_zero")]
    pub peak_mem_used_gb: f64,

    #[serde(rename = "Current State Services", default)]
    pub services: String,

    #[serde(rename = "Target Region", default)]
    pub target_region: String,

    #[serde(rename = "Platform", default)]
    pub platform: String,

    #[serde(rename = "OS Ver", default)]
    pub os_version: String,

    #[serde(rename = "DB Rel/Ver", default)]
    pub db_release: String,

    #[serde(rename = "DB Instance Count", default)]
    pub db_instance_count: String,

    #[serde(rename = "Used Size (GB)", default, deserialize_with = "blank_as_zero")]
    pub used_storage_gb: f64,
}

/// Blank or malformed numeric cells read as zero. Missing telemetry is a
/// data-quality gap the classifier defaults around, not an error.
fn blank_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(0.0))
}

pub fn read_inventory(path: &Path) -> Result<Vec<InventoryRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open inventory file {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: InventoryRecord = row.context("failed to parse inventory row")?;
        records.push(record);
    }

    tracing::info!(records = records.len(), path = %path.display(), "read inventory");
    Ok(records)
}
