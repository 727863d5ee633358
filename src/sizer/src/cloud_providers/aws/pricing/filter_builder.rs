//! Filter builders for AWS pricing queries.

use aws_sdk_pricing::types::Filter as PricingFilters;

use crate::cloud_providers::aws::types::pricing::{Ec2FilterBuilder, RdsFilterBuilder, ServiceCode};
use crate::engine::types::{CellKey, WorkloadClass};

/// Service code and filter set for one pricing cell. Compute cells query
/// the EC2 catalog, database cells the RDS catalog.
pub(super) fn build_cell_filters(cell: &CellKey) -> (ServiceCode, Vec<PricingFilters>) {
    match cell.workload {
        WorkloadClass::Compute(platform) => (
            ServiceCode::Ec2,
            Ec2FilterBuilder::from_cell(cell.region, platform, cell.family).to_filter(),
        ),
        WorkloadClass::Database(engine) => (
            ServiceCode::Rds,
            RdsFilterBuilder::from_cell(cell.region, engine, cell.family).to_filter(),
        ),
    }
}
