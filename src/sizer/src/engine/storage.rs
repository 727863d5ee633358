//! Flat block-storage cost model.

use crate::constants::{EC2_EBS_UNIT_COST, RDS_EBS_UNIT_COST};

/// Monthly block-storage charge, linear in used capacity. No tiering:
/// snapshot and change-rate overhead is already folded into the unit rates.
pub fn storage_monthly_rate(used_gb: f64, is_database: bool) -> f64 {
    let unit_cost = if is_database {
        RDS_EBS_UNIT_COST
    } else {
        EC2_EBS_UNIT_COST
    };
    used_gb * unit_cost
}
