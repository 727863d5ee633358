use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(
    name = "sizer",
    about = "Sizes and prices AWS targets for a CMDB-inventoried fleet",
    version
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Estimate instance types and rates for every inventoried host
    Estimate {
        /// CMDB inventory export (CSV)
        #[clap(long, default_value = "cmdb.csv")]
        input: PathBuf,

        /// Destination for the sizing report (CSV)
        #[clap(long, default_value = "estimate.csv")]
        output: PathBuf,

        /// Skip the pricing API; every record reports unmatched
        #[clap(long)]
        offline: bool,
    },

    /// Show the current version
    Version,
}
