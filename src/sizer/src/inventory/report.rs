use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::engine::storage::storage_monthly_rate;
use crate::engine::types::{Resolution, Shape};
use crate::inventory::InventoryRecord;

/// One output row per inventory record. Matched rows carry the offering and
/// all three rates; unmatched rows leave them blank so the gap stays visible
/// for manual remediation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Node Name")]
    pub node_name: String,

    #[serde(rename = "RDS")]
    pub is_database: bool,

    #[serde(rename = "Cores Calc")]
    pub cores_calc: u32,

    #[serde(rename = "Required Mem (GB)")]
    pub required_mem_gb: f64,

    #[serde(rename = "Family")]
    pub family: String,

    #[serde(rename = "AWS Region")]
    pub region: String,

    #[serde(rename = "Platform")]
    pub platform: String,

    #[serde(rename = "Instance Type")]
    pub instance_type: String,

    #[serde(rename = "One Hr Rate")]
    pub one_hr_rate: Option<f64>,

    #[serde(rename = "One Yr Rate")]
    pub one_yr_rate: Option<f64>,

    #[serde(rename = "Three Yr Rate")]
    pub three_yr_rate: Option<f64>,

    #[serde(rename = "EBS Month Rate")]
    pub ebs_month_rate: f64,
}

impl ReportRow {
    pub fn assemble(record: &InventoryRecord, shape: &Shape, resolution: &Resolution) -> Self {
        let (instance_type, one_hr_rate, one_yr_rate, three_yr_rate) = match resolution {
            Resolution::Matched(offering) => (
                offering.instance_type.clone(),
                Some(offering.on_demand_hourly),
                Some(offering.one_year_rate),
                Some(offering.three_year_rate),
            ),
            Resolution::Unmatched => (String::new(), None, None, None),
        };

        ReportRow {
            node_name: record.node_name.clone(),
            is_database: shape.workload.is_database(),
            cores_calc: shape.required_cores,
            required_mem_gb: shape.required_memory_gb,
            family: shape.family.to_string(),
            region: shape.region.region_code().to_string(),
            platform: shape.workload.label().to_string(),
            instance_type,
            one_hr_rate,
            one_yr_rate,
            three_yr_rate,
            ebs_month_rate: storage_monthly_rate(
                record.used_storage_gb,
                shape.workload.is_database(),
            ),
        }
    }
}

pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;

    for row in rows {
        writer.serialize(row).context("failed to write report row")?;
    }
    writer.flush().context("failed to flush report")?;

    tracing::info!(rows = rows.len(), path = %path.display(), "wrote report");
    Ok(())
}
