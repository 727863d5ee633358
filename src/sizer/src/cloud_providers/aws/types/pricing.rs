use aws_sdk_pricing::types::{Filter as PricingFilters, FilterType as PricingFilterType};

use std::collections::HashMap;

use crate::engine::types::{DbEngine, InstanceFamily, OsPlatform, TargetRegion};

/// One raw price-list record, projected out of the pricing API JSON. A
/// record missing any projected field fails deserialization and is skipped
/// by the fetch loop.
#[derive(Debug, serde_query::DeserializeQuery)]
pub struct RawOffering {
    #[query(".product.sku")]
    pub sku: String,

    #[query(".product.attributes.instanceType")]
    pub instance_type: String,

    #[query(".product.attributes.vcpu")]
    pub vcpu: String,

    #[query(".product.attributes.memory")]
    pub memory: String,

    #[query(".terms.OnDemand")]
    pub on_demand: HashMap<String, serde_json::Value>,

    #[query(".terms.Reserved")]
    pub reserved: HashMap<String, serde_json::Value>,
}

impl RawOffering {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<serde_query::Query<Self>>(value.clone())
            .map(|offering| offering.into())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum ServiceCode {
    Ec2,
    Rds,
}

impl ServiceCode {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            ServiceCode::Ec2 => "AmazonEC2",
            ServiceCode::Rds => "AmazonRDS",
        }
    }
}

fn term_match(field: &str, value: &str) -> PricingFilters {
    PricingFilters::builder()
        .field(field.to_string())
        .value(value.to_string())
        .r#type(PricingFilterType::TermMatch)
        .build()
        .expect("failed to build pricing filter")
}

/// Filter set for one compute cell: current-generation shared-tenancy
/// instances with no bundled software, in the cell's location, OS and
/// API family.
#[derive(Debug)]
pub struct Ec2FilterBuilder {
    pub location: String,
    pub operating_system: String,
    pub instance_family: String,
}

impl Ec2FilterBuilder {
    pub fn from_cell(region: TargetRegion, platform: OsPlatform, family: InstanceFamily) -> Self {
        Self {
            location: region.location().to_string(),
            operating_system: platform.api_name().to_string(),
            instance_family: family.ec2_api_family().to_string(),
        }
    }

    pub fn to_filter(&self) -> Vec<PricingFilters> {
        vec![
            term_match("location", &self.location),
            term_match("operatingSystem", &self.operating_system),
            term_match("instanceFamily", &self.instance_family),
            term_match("currentGeneration", "Yes"),
            term_match("licenseModel", "No License required"),
            term_match("tenancy", "Shared"),
            term_match("preInstalledSw", "NA"),
        ]
    }
}

/// Filter set for one database cell. Aurora is only offered on the
/// memory-optimized tier and without a bundled license; the other engines
/// price general-purpose unless the cell itself is memory-optimized.
#[derive(Debug)]
pub struct RdsFilterBuilder {
    pub location: String,
    pub database_engine: String,
    pub instance_family: String,
    pub license_model: String,
}

impl RdsFilterBuilder {
    pub fn from_cell(region: TargetRegion, engine: DbEngine, family: InstanceFamily) -> Self {
        let instance_family = match engine {
            DbEngine::AuroraMysql => "Memory optimized",
            DbEngine::Oracle | DbEngine::SqlServer => match family {
                InstanceFamily::MemoryOptimized => "Memory optimized",
                _ => "General purpose",
            },
        };

        Self {
            location: region.location().to_string(),
            database_engine: engine.api_name().to_string(),
            instance_family: instance_family.to_string(),
            license_model: engine.license_model().to_string(),
        }
    }

    pub fn to_filter(&self) -> Vec<PricingFilters> {
        vec![
            term_match("location", &self.location),
            term_match("databaseEngine", &self.database_engine),
            term_match("currentGeneration", "Yes"),
            term_match("instanceFamily", &self.instance_family),
            term_match("licenseModel", &self.license_model),
        ]
    }
}
