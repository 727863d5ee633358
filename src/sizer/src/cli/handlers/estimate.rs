use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::cloud_providers::aws::pricing::PricingSource;
use crate::config::ConfigLoader;
use crate::engine;
use crate::inventory;

/// Run the full estimate: read the inventory, price it, write the report.
pub async fn estimate(input: &Path, output: &Path, offline: bool) -> Result<()> {
    let started = Instant::now();
    let records = inventory::read_inventory(input)?;

    let pricing = if offline {
        tracing::info!("offline mode, skipping the pricing API");
        PricingSource::Static
    } else {
        let config = ConfigLoader::load_default_config()?;
        PricingSource::new(config.aws_init_type, &config.pricing_endpoint_region).await
    };

    let rows = engine::run_estimate(&records, &pricing).await;

    let unmatched = rows.iter().filter(|row| row.instance_type.is_empty()).count();
    if unmatched > 0 {
        tracing::warn!(
            unmatched,
            total = rows.len(),
            "records without a feasible offering, review the report"
        );
    }

    inventory::write_report(output, &rows)?;
    tracing::info!(elapsed = ?started.elapsed(), "estimate complete");
    Ok(())
}
