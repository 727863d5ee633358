use std::fmt;

/// Instance family tier inferred from a host's capacity envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstanceFamily {
    GeneralPurpose,
    ComputeOptimized,
    MemoryOptimized,
    Burstable,
}

impl InstanceFamily {
    /// Value for the pricing API `instanceFamily` filter on the EC2 catalog.
    /// Burstable types are listed under "General purpose" there; the
    /// normalizer separates them back out by instance-type prefix.
    pub fn ec2_api_family(&self) -> &'static str {
        match self {
            InstanceFamily::ComputeOptimized => "Compute optimized",
            InstanceFamily::MemoryOptimized => "Memory optimized",
            InstanceFamily::GeneralPurpose | InstanceFamily::Burstable => "General purpose",
        }
    }
}

impl fmt::Display for InstanceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstanceFamily::GeneralPurpose => "General purpose",
            InstanceFamily::ComputeOptimized => "Compute optimized",
            InstanceFamily::MemoryOptimized => "Memory optimized",
            InstanceFamily::Burstable => "Burstable",
        };
        f.write_str(name)
    }
}

/// The three regions the fleet can land in. Unmapped source region codes
/// fall back to us-east-1 in the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetRegion {
    UsEast1,
    EuCentral1,
    ApSoutheast1,
}

impl TargetRegion {
    pub fn region_code(&self) -> &'static str {
        match self {
            TargetRegion::UsEast1 => "us-east-1",
            TargetRegion::EuCentral1 => "eu-central-1",
            TargetRegion::ApSoutheast1 => "ap-southeast-1",
        }
    }

    /// Human-readable location name, as required by the pricing API
    /// `location` filter.
    pub fn location(&self) -> &'static str {
        match self {
            TargetRegion::UsEast1 => "US East (N. Virginia)",
            TargetRegion::EuCentral1 => "EU (Frankfurt)",
            TargetRegion::ApSoutheast1 => "Asia Pacific (Singapore)",
        }
    }
}

impl fmt::Display for TargetRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region_code())
    }
}

/// Target operating system for compute workloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OsPlatform {
    Windows,
    Rhel,
    Linux,
}

impl OsPlatform {
    pub fn api_name(&self) -> &'static str {
        match self {
            OsPlatform::Windows => "Windows",
            OsPlatform::Rhel => "RHEL",
            OsPlatform::Linux => "Linux",
        }
    }
}

/// Target managed-database engine for database workloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DbEngine {
    Oracle,
    SqlServer,
    AuroraMysql,
}

impl DbEngine {
    pub fn api_name(&self) -> &'static str {
        match self {
            DbEngine::Oracle => "Oracle",
            DbEngine::SqlServer => "SQL Server",
            DbEngine::AuroraMysql => "Aurora MySQL",
        }
    }

    /// RDS license model filter value. Aurora is the only engine priced
    /// without a bundled license.
    pub fn license_model(&self) -> &'static str {
        match self {
            DbEngine::AuroraMysql => "No license required",
            DbEngine::Oracle | DbEngine::SqlServer => "License included",
        }
    }
}

/// Whether a host targets a plain compute instance or a managed database,
/// together with the platform/engine axis of its pricing cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkloadClass {
    Compute(OsPlatform),
    Database(DbEngine),
}

impl WorkloadClass {
    pub fn is_database(&self) -> bool {
        matches!(self, WorkloadClass::Database(_))
    }

    /// Platform-or-engine label carried into the report.
    pub fn label(&self) -> &'static str {
        match self {
            WorkloadClass::Compute(platform) => platform.api_name(),
            WorkloadClass::Database(engine) => engine.api_name(),
        }
    }
}

/// The capacity + placement tuple inferred for one inventory record.
/// Immutable once classified.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub required_cores: u32,
    pub required_memory_gb: f64,
    pub family: InstanceFamily,
    pub region: TargetRegion,
    pub workload: WorkloadClass,
}

impl Shape {
    pub fn cell(&self) -> CellKey {
        CellKey {
            region: self.region,
            workload: self.workload,
            family: self.family,
        }
    }
}

/// One (region, platform-or-engine, family) partition of the catalog and of
/// the inventory. `Ord` so cell iteration is deterministic run to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub region: TargetRegion,
    pub workload: WorkloadClass,
    pub family: InstanceFamily,
}

/// One normalized, priced catalog unit within a cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Offering {
    pub instance_type: String,
    pub vcpu: u32,
    pub memory_gb: u64,
    pub on_demand_hourly: f64,
    pub one_year_rate: f64,
    pub three_year_rate: f64,
}

/// Outcome of matching one record against its cell's candidate list. A
/// record is either fully matched or left unmatched, never in between.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Resolution {
    Matched(Offering),
    #[default]
    Unmatched,
}
