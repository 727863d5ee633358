//! Shape inference over raw CMDB rows.
//!
//! Classification is total: every branch has a default, so garbage metadata
//! yields a default shape rather than an error. The CMDB is a data-quality
//! problem, not a failure mode.

use crate::engine::types::{DbEngine, InstanceFamily, OsPlatform, Shape, TargetRegion, WorkloadClass};
use crate::inventory::InventoryRecord;

const COMPUTE_OPTIMIZED_MAX_RATIO: f64 = 3.5;
const MEMORY_OPTIMIZED_MIN_RATIO: f64 = 4.5;

const BURSTABLE_MAX_CORES: u32 = 8;
const BURSTABLE_MAX_MEMORY_GB: f64 = 32.0;
const BURSTABLE_SERVICE_TAGS: [&str; 3] = ["Dev", "QA", "Test"];

/// Derive the target shape for one inventory record. Pure and deterministic.
pub fn classify(record: &InventoryRecord) -> Shape {
    let required_cores = required_cores(record.cpu, record.peak_cpu_load);
    let required_memory_gb = required_memory_gb(record);

    let workload = if is_database_workload(&record.db_instance_count) {
        WorkloadClass::Database(map_engine(&record.db_release))
    } else {
        WorkloadClass::Compute(map_platform(&record.platform, &record.os_version))
    };

    Shape {
        required_cores,
        required_memory_gb,
        family: infer_family(required_cores, required_memory_gb, &record.services),
        region: map_region(&record.target_region),
        workload,
    }
}

/// A host is a managed-database target iff the CMDB reports an instance
/// count that is neither blank nor the literal "0". String-level check:
/// zero-padded counts like "00" still read as database hosts.
fn is_database_workload(db_instance_count: &str) -> bool {
    let count = db_instance_count.trim();
    !count.is_empty() && count != "0"
}

/// Cores needed at peak, rounded half-up. The 0.51 bias pushes marginal
/// hosts up a core instead of truncating their headroom away.
fn required_cores(cpu: f64, peak_cpu_load: f64) -> u32 {
    (cpu * peak_cpu_load + 0.51).round().max(0.0) as u32
}

/// Peak used memory when telemetry exists; otherwise the full provisioned
/// amount is assumed used.
fn required_memory_gb(record: &InventoryRecord) -> f64 {
    if record.peak_mem_used_gb > 0.0 {
        record.peak_mem_used_gb
    } else {
        record.mem_provisioned_mb / 1000.0
    }
}

/// First match wins: burstable for small tagged non-production hosts, then
/// the memory-to-core ratio splits compute-bound from memory-bound, with
/// [3.5, 4.5] as the general-purpose neutral band.
fn infer_family(required_cores: u32, required_memory_gb: f64, services: &str) -> InstanceFamily {
    let non_production = BURSTABLE_SERVICE_TAGS
        .iter()
        .any(|tag| services.contains(tag));

    if required_cores <= BURSTABLE_MAX_CORES
        && required_memory_gb <= BURSTABLE_MAX_MEMORY_GB
        && non_production
    {
        return InstanceFamily::Burstable;
    }

    // NaN (0/0) falls through both comparisons into the neutral band, which
    // is the right default for a host with no usable telemetry.
    let ratio = required_memory_gb / f64::from(required_cores);
    if ratio < COMPUTE_OPTIMIZED_MAX_RATIO {
        InstanceFamily::ComputeOptimized
    } else if ratio > MEMORY_OPTIMIZED_MIN_RATIO {
        InstanceFamily::MemoryOptimized
    } else {
        InstanceFamily::GeneralPurpose
    }
}

fn map_region(target_region: &str) -> TargetRegion {
    match target_region.trim() {
        "AP" => TargetRegion::ApSoutheast1,
        "EU" => TargetRegion::EuCentral1,
        "US" => TargetRegion::UsEast1,
        other => {
            if !other.is_empty() {
                tracing::debug!(region = other, "unmapped target region, defaulting to us-east-1");
            }
            TargetRegion::UsEast1
        }
    }
}

/// Best-effort substring mapping over free-text platform metadata. Red Hat
/// shows up in the OS version field, not the platform field.
fn map_platform(platform: &str, os_version: &str) -> OsPlatform {
    let platform_upper = platform.to_uppercase();

    if platform_upper.contains("WINDOWS") {
        OsPlatform::Windows
    } else if platform_upper.contains("LINUX") {
        if ["RHEL", "Red", "RED"]
            .iter()
            .any(|marker| os_version.contains(marker))
        {
            OsPlatform::Rhel
        } else {
            OsPlatform::Linux
        }
    } else {
        if !platform.trim().is_empty() {
            tracing::debug!(platform, "unmapped platform, defaulting to Linux");
        }
        OsPlatform::Linux
    }
}

fn map_engine(db_release: &str) -> DbEngine {
    if db_release.contains("Oracle") {
        DbEngine::Oracle
    } else if db_release.contains("SQL ") {
        // Trailing space is significant: "NoSQL" must not match.
        DbEngine::SqlServer
    } else {
        DbEngine::AuroraMysql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record() -> InventoryRecord {
        InventoryRecord {
            node_name: "host01".into(),
            cpu: 4.0,
            peak_cpu_load: 1.0,
            mem_provisioned_mb: 16_000.0,
            peak_mem_used_gb: 0.0,
            services: "Prod".into(),
            target_region: "EU".into(),
            platform: "Linux".into(),
            os_version: String::new(),
            db_release: String::new(),
            db_instance_count: "0".into(),
            used_storage_gb: 100.0,
        }
    }

    #[test]
    fn classifies_the_reference_host() {
        let shape = classify(&record());

        assert_eq!(shape.required_cores, 5); // 4 * 1.0 + 0.51 rounds up
        assert_eq!(shape.required_memory_gb, 16.0); // provisioned fallback
        assert_eq!(shape.family, InstanceFamily::ComputeOptimized); // 16/5 = 3.2
        assert_eq!(shape.region, TargetRegion::EuCentral1);
        assert_eq!(shape.workload, WorkloadClass::Compute(OsPlatform::Linux));
    }

    #[test]
    fn classification_is_idempotent() {
        let record = record();
        assert_eq!(classify(&record), classify(&record));
    }

    #[rstest]
    #[case("", false)]
    #[case("0", false)]
    #[case(" 0 ", false)]
    #[case("00", true)]
    #[case("2", true)]
    #[case(" 3 ", true)]
    fn database_detection_is_string_level(#[case] count: &str, #[case] expected: bool) {
        assert_eq!(is_database_workload(count), expected);
    }

    #[rstest]
    #[case(4.0, 1.0, 5)]
    #[case(8.0, 0.8, 7)] // 6.91 rounds up
    #[case(2.0, 0.2, 1)] // 0.91 rounds up
    #[case(1.0, 0.1, 1)] // 0.61 rounds up
    #[case(0.0, 0.0, 1)] // the bias alone rounds to one core
    fn core_requirement_rounds_half_up(#[case] cpu: f64, #[case] load: f64, #[case] expected: u32) {
        assert_eq!(required_cores(cpu, load), expected);
    }

    #[test]
    fn peak_memory_wins_over_provisioned() {
        let mut record = record();
        record.peak_mem_used_gb = 12.0;
        assert_eq!(required_memory_gb(&record), 12.0);
    }

    #[rstest]
    #[case(2, 7.0, InstanceFamily::GeneralPurpose)] // ratio exactly 3.5
    #[case(2, 9.0, InstanceFamily::GeneralPurpose)] // ratio exactly 4.5
    #[case(2, 6.9, InstanceFamily::ComputeOptimized)]
    #[case(2, 9.1, InstanceFamily::MemoryOptimized)]
    #[case(16, 64.0, InstanceFamily::GeneralPurpose)] // ratio 4.0, neutral band
    fn ratio_band_boundaries_are_exclusive(
        #[case] cores: u32,
        #[case] memory_gb: f64,
        #[case] expected: InstanceFamily,
    ) {
        assert_eq!(infer_family(cores, memory_gb, "Prod"), expected);
    }

    #[rstest]
    #[case("Dev Web", 8, 32.0, InstanceFamily::Burstable)]
    #[case("QA", 2, 4.0, InstanceFamily::Burstable)]
    #[case("Test rig", 1, 2.0, InstanceFamily::Burstable)]
    #[case("Prod", 2, 4.0, InstanceFamily::ComputeOptimized)] // no tag
    #[case("Dev Web", 9, 4.0, InstanceFamily::ComputeOptimized)] // too many cores
    #[case("Dev Web", 8, 33.0, InstanceFamily::GeneralPurpose)] // too much memory, 33/8 in band
    #[case("dev", 2, 4.0, InstanceFamily::ComputeOptimized)] // tag match is case-sensitive
    fn burstable_requires_small_shape_and_tag(
        #[case] services: &str,
        #[case] cores: u32,
        #[case] memory_gb: f64,
        #[case] expected: InstanceFamily,
    ) {
        assert_eq!(infer_family(cores, memory_gb, services), expected);
    }

    #[test]
    fn zero_telemetry_lands_in_the_neutral_band() {
        assert_eq!(infer_family(0, 0.0, "Prod"), InstanceFamily::GeneralPurpose);
    }

    #[rstest]
    #[case("US", TargetRegion::UsEast1)]
    #[case("EU", TargetRegion::EuCentral1)]
    #[case("AP", TargetRegion::ApSoutheast1)]
    #[case("", TargetRegion::UsEast1)]
    #[case("LATAM", TargetRegion::UsEast1)]
    fn unmapped_regions_default_to_us_east(#[case] code: &str, #[case] expected: TargetRegion) {
        assert_eq!(map_region(code), expected);
    }

    #[rstest]
    #[case("WINDOWS Server 2019", "", OsPlatform::Windows)]
    #[case("Windows", "", OsPlatform::Windows)]
    #[case("LINUX", "RHEL 7.9", OsPlatform::Rhel)]
    #[case("Linux x86", "Red Hat Enterprise", OsPlatform::Rhel)]
    #[case("LINUX", "Ubuntu 20.04", OsPlatform::Linux)]
    #[case("Solaris", "11", OsPlatform::Linux)]
    #[case("", "", OsPlatform::Linux)]
    fn platform_mapping_is_best_effort(
        #[case] platform: &str,
        #[case] os_version: &str,
        #[case] expected: OsPlatform,
    ) {
        assert_eq!(map_platform(platform, os_version), expected);
    }

    #[rstest]
    #[case("Oracle 19c", DbEngine::Oracle)]
    #[case("SQL Server 2017", DbEngine::SqlServer)]
    #[case("NoSQL", DbEngine::AuroraMysql)] // no trailing space after "SQL"
    #[case("MariaDB 10.6", DbEngine::AuroraMysql)]
    #[case("", DbEngine::AuroraMysql)]
    fn engine_mapping_defaults_to_aurora(#[case] release: &str, #[case] expected: DbEngine) {
        assert_eq!(map_engine(release), expected);
    }
}
