//! AWS Pricing API client.

use aws_sdk_pricing as pricing;
use aws_sdk_pricing::types::Filter as PricingFilters;
use serde_query::DeserializeQuery;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use crate::cloud_providers::aws::config::{resolve_available_aws_config, AwsConfig};
use crate::cloud_providers::aws::types::pricing::{RawOffering, ServiceCode};
use crate::engine::types::CellKey;

use super::filter_builder::build_cell_filters;

const RETRY_BASE_MS: u64 = 500;
const RETRY_ATTEMPTS: usize = 3;

/// Client for the AWS Pricing API.
pub struct PricingClient {
    pub pricing_client: Option<pricing::Client>,
}

impl PricingClient {
    /// Creates a new PricingClient instance.
    /// Note: the pricing API is only served out of us-east-1.
    pub async fn new(initialization_conf: AwsConfig, region: &str) -> Self {
        let config = resolve_available_aws_config(initialization_conf, region).await;

        Self {
            pricing_client: config.as_ref().map(pricing::client::Client::new),
        }
    }

    /// Fetch every raw offering for one cell, retrying transient API
    /// failures with backoff. Exhausted retries yield `None`.
    pub async fn fetch_cell_offerings(&self, cell: &CellKey) -> Option<Vec<RawOffering>> {
        let (service_code, filters) = build_cell_filters(cell);
        self.retry_fetch_all::<RawOffering>(service_code, Some(filters))
            .await
    }

    async fn retry_fetch_all<T>(
        &self,
        service_code: ServiceCode,
        filters: Option<Vec<PricingFilters>>,
    ) -> Option<Vec<T>>
    where
        T: for<'de> DeserializeQuery<'de> + Send + Sync,
    {
        let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MS).take(RETRY_ATTEMPTS);

        let result = Retry::spawn(strategy, {
            let filters = filters.clone();
            let service_code = service_code.clone();

            move || {
                let filters = filters.clone();
                let service_code = service_code.clone();
                async move { self.fetch_all::<T>(service_code, filters).await }
            }
        })
        .await;

        result
            .map_err(|err| tracing::warn!(?err, "pricing query failed"))
            .ok()
    }

    async fn fetch_all<T>(
        &self,
        service_code: ServiceCode,
        filters: Option<Vec<PricingFilters>>,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>
    where
        T: for<'de> DeserializeQuery<'de>,
    {
        let client = self
            .pricing_client
            .as_ref()
            .ok_or("pricing client not initialized")?;

        let mut paginator = client
            .get_products()
            .service_code(service_code.as_str())
            .set_filters(filters)
            .into_paginator()
            .send();

        let mut results = Vec::new();

        while let Some(output) = paginator.next().await {
            let output = output?;
            for product in output.price_list() {
                // Records that fail projection (missing attributes or terms)
                // are skipped, not fatal.
                if let Ok(offering) = serde_json::from_str::<serde_query::Query<T>>(product) {
                    results.push(offering.into());
                }
            }
        }

        Ok(results)
    }
}
