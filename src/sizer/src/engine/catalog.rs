//! Catalog normalization: raw price-list records into a sorted, de-duplicated
//! candidate list for one pricing cell.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::cloud_providers::aws::types::pricing::RawOffering;
use crate::engine::types::{DbEngine, InstanceFamily, Offering, WorkloadClass};

/// Hours in a non-leap year, used to annualize residual hourly charges.
const HOURS_IN_YEAR: f64 = 8760.0;

/// Previous-generation prefixes excluded from every cell. The stricter of
/// the two historical exclusion lists, applied uniformly across regions.
const LEGACY_PREFIXES: [&str; 6] = ["m3", "m4", "c3", "c4", "r3", "t2"];

// Price-list term and rate codes. Terms are keyed `SKU.TERM`, price
// dimensions `SKU.TERM.RATE`.
const ON_DEMAND_TERM: &str = "JRTCKXETXF";
const ON_DEMAND_RATE: &str = "6YS6EN2CT7";
const ONE_YEAR_TERM: &str = "6QCMYABX3D";
const ONE_YEAR_TERM_SQL_SERVER: &str = "HU7G6KETJZ";
const THREE_YEAR_TERM: &str = "NQ3QZPMQV9";
const RESERVED_RATE: &str = "2TG2D8R56U";

/// Normalize one cell's raw offerings: drop legacy generations and excluded
/// sub-variants, parse capacity and rates, de-duplicate by instance type,
/// and sort by the family comparator.
pub fn normalize(
    raw: &[RawOffering],
    family: InstanceFamily,
    workload: WorkloadClass,
) -> Vec<Offering> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<Offering> = raw
        .iter()
        .filter(|offering| !is_excluded(&offering.instance_type, family))
        .filter_map(|offering| {
            let parsed = to_offering(offering, workload);
            if parsed.is_none() {
                tracing::debug!(
                    instance_type = %offering.instance_type,
                    "dropping offering with unexpected catalog layout"
                );
            }
            parsed
        })
        .filter(|offering| seen.insert(offering.instance_type.clone()))
        .collect();

    sort_candidates(&mut candidates, family);
    candidates
}

/// Instance generation, i.e. the text before the first dot ("m5" out of
/// "m5.xlarge", "db" out of "db.r5.large").
fn generation_prefix(instance_type: &str) -> &str {
    instance_type.split('.').next().unwrap_or(instance_type)
}

fn is_excluded(instance_type: &str, family: InstanceFamily) -> bool {
    let prefix = generation_prefix(instance_type);
    if LEGACY_PREFIXES.contains(&prefix) {
        return true;
    }
    // The burstable cell is fetched under the "General purpose" API family,
    // which also returns m-types; only the t-tier belongs there.
    family == InstanceFamily::Burstable && prefix.starts_with('m')
}

/// Any expected term or rate key missing from the record is a per-offering
/// parse failure: the offering is dropped, the cell survives.
fn to_offering(raw: &RawOffering, workload: WorkloadClass) -> Option<Offering> {
    let vcpu = raw.vcpu.trim().parse().ok()?;
    let memory_gb = parse_memory_gb(&raw.memory)?;

    let on_demand_hourly = rate_dimension(&raw.on_demand, &raw.sku, ON_DEMAND_TERM, ON_DEMAND_RATE)?;

    let one_year_rate = match workload {
        WorkloadClass::Database(DbEngine::SqlServer) => {
            // The SQL Server 1-yr term has no all-upfront representation:
            // reconstruct the effective rate as the upfront portion plus the
            // residual hourly charge annualized over a full year.
            let upfront =
                rate_dimension(&raw.reserved, &raw.sku, ONE_YEAR_TERM_SQL_SERVER, RESERVED_RATE)?;
            let residual_hourly =
                rate_dimension(&raw.reserved, &raw.sku, ONE_YEAR_TERM_SQL_SERVER, ON_DEMAND_RATE)?;
            upfront + residual_hourly * HOURS_IN_YEAR
        }
        _ => rate_dimension(&raw.reserved, &raw.sku, ONE_YEAR_TERM, RESERVED_RATE)?,
    };

    let three_year_rate = rate_dimension(&raw.reserved, &raw.sku, THREE_YEAR_TERM, RESERVED_RATE)?;

    Some(Offering {
        instance_type: raw.instance_type.clone(),
        vcpu,
        memory_gb,
        on_demand_hourly,
        one_year_rate,
        three_year_rate,
    })
}

/// Walk `terms -> priceDimensions -> pricePerUnit.USD` for one term/rate
/// code pair.
fn rate_dimension(
    terms: &HashMap<String, Value>,
    sku: &str,
    term_code: &str,
    rate_code: &str,
) -> Option<f64> {
    let term_key = format!("{sku}.{term_code}");
    let dimension_key = format!("{term_key}.{rate_code}");
    terms
        .get(&term_key)?
        .get("priceDimensions")?
        .get(&dimension_key)?
        .get("pricePerUnit")?
        .get("USD")?
        .as_str()?
        .trim()
        .parse()
        .ok()
}

/// Parse a free-text memory descriptor ("1,024 GiB", "3.75 GiB") into whole
/// GB. The fractional remainder is dropped before digit-stripping so
/// "3.75 GiB" reads as 3, not 375. Lossy for sub-1GB sizes.
fn parse_memory_gb(memory: &str) -> Option<u64> {
    let value = memory
        .trim()
        .trim_end_matches("GiB")
        .trim_end_matches("GB")
        .trim();
    let integer_part = value.split('.').next().unwrap_or(value);
    let digits: String = integer_part
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Memory-bound workloads walk the memory tiers first; every other family
/// walks core counts first. Stable sort, so catalog order breaks ties.
fn sort_candidates(candidates: &mut [Offering], family: InstanceFamily) {
    match family {
        InstanceFamily::MemoryOptimized => candidates.sort_by(|a, b| {
            a.memory_gb
                .cmp(&b.memory_gb)
                .then(a.vcpu.cmp(&b.vcpu))
        }),
        _ => candidates.sort_by(|a, b| {
            a.vcpu
                .cmp(&b.vcpu)
                .then(a.memory_gb.cmp(&b.memory_gb))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::OsPlatform;
    use rstest::rstest;
    use serde_json::json;

    fn raw_offering(instance_type: &str, vcpu: &str, memory: &str) -> RawOffering {
        let sku = "SKUFIXTURE";
        let value = json!({
            "product": {
                "sku": sku,
                "attributes": {
                    "instanceType": instance_type,
                    "vcpu": vcpu,
                    "memory": memory,
                }
            },
            "terms": {
                "OnDemand": {
                    "SKUFIXTURE.JRTCKXETXF": {
                        "priceDimensions": {
                            "SKUFIXTURE.JRTCKXETXF.6YS6EN2CT7": {
                                "pricePerUnit": { "USD": "0.1000000000" }
                            }
                        }
                    }
                },
                "Reserved": {
                    "SKUFIXTURE.6QCMYABX3D": {
                        "priceDimensions": {
                            "SKUFIXTURE.6QCMYABX3D.2TG2D8R56U": {
                                "pricePerUnit": { "USD": "500.00" }
                            }
                        }
                    },
                    "SKUFIXTURE.NQ3QZPMQV9": {
                        "priceDimensions": {
                            "SKUFIXTURE.NQ3QZPMQV9.2TG2D8R56U": {
                                "pricePerUnit": { "USD": "900.00" }
                            }
                        }
                    }
                }
            }
        });
        RawOffering::from_json(&value).unwrap()
    }

    fn compute_cell() -> WorkloadClass {
        WorkloadClass::Compute(OsPlatform::Linux)
    }

    #[rstest]
    #[case("16 GiB", Some(16))]
    #[case("1,024 GiB", Some(1024))]
    #[case("3.75 GiB", Some(3))]
    #[case("0.5 GiB", Some(0))]
    #[case("32 GB", Some(32))]
    #[case("N/A", None)]
    #[case("", None)]
    fn memory_parsing_truncates_fractions(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_memory_gb(input), expected);
    }

    #[rstest]
    #[case("m3.large", InstanceFamily::GeneralPurpose, true)]
    #[case("m4.xlarge", InstanceFamily::GeneralPurpose, true)]
    #[case("c4.large", InstanceFamily::ComputeOptimized, true)]
    #[case("t2.micro", InstanceFamily::Burstable, true)]
    #[case("m5.large", InstanceFamily::GeneralPurpose, false)]
    #[case("m5.large", InstanceFamily::Burstable, true)] // m-tier out of the burstable cell
    #[case("t3.micro", InstanceFamily::Burstable, false)]
    #[case("db.r5.large", InstanceFamily::MemoryOptimized, false)] // "db" prefix never legacy
    fn legacy_and_overlap_exclusions(
        #[case] instance_type: &str,
        #[case] family: InstanceFamily,
        #[case] excluded: bool,
    ) {
        assert_eq!(is_excluded(instance_type, family), excluded);
    }

    #[test]
    fn normalizes_and_sorts_by_vcpu_then_memory() {
        let raw = vec![
            raw_offering("m5.2xlarge", "8", "32 GiB"),
            raw_offering("m5.large", "2", "8 GiB"),
            raw_offering("m5.xlarge", "4", "16 GiB"),
        ];

        let candidates = normalize(&raw, InstanceFamily::GeneralPurpose, compute_cell());

        let order: Vec<&str> = candidates
            .iter()
            .map(|o| o.instance_type.as_str())
            .collect();
        assert_eq!(order, ["m5.large", "m5.xlarge", "m5.2xlarge"]);
        assert_eq!(candidates[0].vcpu, 2);
        assert_eq!(candidates[0].memory_gb, 8);
        assert!((candidates[0].on_demand_hourly - 0.1).abs() < 1e-9);
        assert!((candidates[0].one_year_rate - 500.0).abs() < 1e-9);
        assert!((candidates[0].three_year_rate - 900.0).abs() < 1e-9);
    }

    #[test]
    fn memory_optimized_sorts_by_memory_then_vcpu() {
        let raw = vec![
            raw_offering("r5.2xlarge", "8", "64 GiB"),
            raw_offering("r5a.xlarge", "4", "32 GiB"),
            raw_offering("r5.xlarge", "2", "32 GiB"),
        ];

        let candidates = normalize(&raw, InstanceFamily::MemoryOptimized, compute_cell());

        let order: Vec<&str> = candidates
            .iter()
            .map(|o| o.instance_type.as_str())
            .collect();
        assert_eq!(order, ["r5.xlarge", "r5a.xlarge", "r5.2xlarge"]);
    }

    #[test]
    fn duplicate_instance_types_keep_first_occurrence() {
        let raw = vec![
            raw_offering("m5.large", "2", "8 GiB"),
            raw_offering("m5.large", "2", "8 GiB"),
        ];

        let candidates = normalize(&raw, InstanceFamily::GeneralPurpose, compute_cell());
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn offering_without_reserved_terms_is_dropped() {
        let mut broken = raw_offering("m5.large", "2", "8 GiB");
        broken.reserved.clear();
        let raw = vec![broken, raw_offering("m5.xlarge", "4", "16 GiB")];

        let candidates = normalize(&raw, InstanceFamily::GeneralPurpose, compute_cell());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].instance_type, "m5.xlarge");
    }

    #[test]
    fn offering_with_unparseable_vcpu_is_dropped() {
        let broken = raw_offering("m5.large", "N/A", "8 GiB");
        let candidates = normalize(&[broken], InstanceFamily::GeneralPurpose, compute_cell());
        assert!(candidates.is_empty());
    }

    #[test]
    fn sql_server_one_year_rate_is_reconstructed() {
        let value = json!({
            "product": {
                "sku": "SKUdb",
                "attributes": {
                    "instanceType": "db.m5.large",
                    "vcpu": "2",
                    "memory": "8 GiB",
                }
            },
            "terms": {
                "OnDemand": {
                    "SKUdb.JRTCKXETXF": {
                        "priceDimensions": {
                            "SKUdb.JRTCKXETXF.6YS6EN2CT7": {
                                "pricePerUnit": { "USD": "0.30" }
                            }
                        }
                    }
                },
                "Reserved": {
                    "SKUdb.HU7G6KETJZ": {
                        "priceDimensions": {
                            "SKUdb.HU7G6KETJZ.2TG2D8R56U": {
                                "pricePerUnit": { "USD": "100.00" }
                            },
                            "SKUdb.HU7G6KETJZ.6YS6EN2CT7": {
                                "pricePerUnit": { "USD": "0.01" }
                            }
                        }
                    },
                    "SKUdb.NQ3QZPMQV9": {
                        "priceDimensions": {
                            "SKUdb.NQ3QZPMQV9.2TG2D8R56U": {
                                "pricePerUnit": { "USD": "900.00" }
                            }
                        }
                    }
                }
            }
        });
        let raw = RawOffering::from_json(&value).unwrap();

        let candidates = normalize(
            std::slice::from_ref(&raw),
            InstanceFamily::GeneralPurpose,
            WorkloadClass::Database(DbEngine::SqlServer),
        );

        assert_eq!(candidates.len(), 1);
        // 100.00 upfront + 0.01/hr * 8760 hours
        assert!((candidates[0].one_year_rate - 187.60).abs() < 1e-9);
    }

    #[test]
    fn non_sql_engines_use_the_reported_reserved_rate() {
        let raw = raw_offering("db.r5.large", "2", "16 GiB");
        let candidates = normalize(
            std::slice::from_ref(&raw),
            InstanceFamily::MemoryOptimized,
            WorkloadClass::Database(DbEngine::Oracle),
        );
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].one_year_rate - 500.0).abs() < 1e-9);
    }
}
