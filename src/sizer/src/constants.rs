/// Flat block-storage unit rates in USD per GB-month. Snapshot overhead at
/// ~1% monthly change rate is folded into the constants.
pub const EC2_EBS_UNIT_COST: f64 = 0.151;
pub const RDS_EBS_UNIT_COST: f64 = 0.116;

/// The pricing API is only served out of us-east-1, regardless of which
/// region is being priced.
pub const PRICING_ENDPOINT_REGION: &str = "us-east-1";
