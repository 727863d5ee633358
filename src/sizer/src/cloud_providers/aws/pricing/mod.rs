mod client;
mod filter_builder;


pub use client::PricingClient;

use crate::cloud_providers::aws::config::AwsConfig;
use crate::cloud_providers::aws::types::pricing::RawOffering;
use crate::engine::types::CellKey;

/// Where catalog offerings come from. `Static` serves no offerings and keeps
/// the pipeline runnable offline; every record then reports unmatched.
pub enum PricingSource {
    Static,
    Live(PricingClient),
}

impl PricingSource {
    pub async fn new(initialization_conf: AwsConfig, endpoint_region: &str) -> Self {
        let client = PricingClient::new(initialization_conf, endpoint_region).await;

        match client.pricing_client {
            Some(_) => PricingSource::Live(client),
            None => {
                tracing::warn!("AWS credentials unavailable, falling back to offline pricing");
                PricingSource::Static
            }
        }
    }

    /// Every raw offering for one cell. Fetch failures degrade to an empty
    /// list, so the cell's records report unmatched instead of aborting the
    /// run.
    pub async fn fetch_offerings(&self, cell: &CellKey) -> Vec<RawOffering> {
        match self {
            PricingSource::Static => Vec::new(),
            PricingSource::Live(client) => match client.fetch_cell_offerings(cell).await {
                Some(raw) => raw,
                None => {
                    tracing::warn!(?cell, "pricing fetch failed after retries, cell will report unmatched");
                    Vec::new()
                }
            },
        }
    }
}
