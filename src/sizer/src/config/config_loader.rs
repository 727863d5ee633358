use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cloud_providers::aws::config::AwsConfig;
use crate::constants::PRICING_ENDPOINT_REGION;
use config::Config as RConfig;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub aws_init_type: AwsConfig,
    pub pricing_endpoint_region: String,
}

pub struct ConfigLoader;

impl ConfigLoader {
    fn get_aws_default_profile() -> String {
        match dirs::home_dir() {
            None => "default",
            Some(path) => {
                if std::fs::read_to_string(path.join(".aws/credentials"))
                    .unwrap_or_default()
                    .contains("[me]")
                {
                    "me"
                } else {
                    "default"
                }
            }
        }
        .to_string()
    }

    pub fn load_default_config() -> Result<Config> {
        let builder = RConfig::builder()
            .set_default(
                "aws_init_type",
                AwsConfig::Profile(Self::get_aws_default_profile()),
            )?
            .set_default("pricing_endpoint_region", PRICING_ENDPOINT_REGION)?;

        builder
            .build()?
            .try_deserialize()
            .context("failed to parse configuration")
    }
}
