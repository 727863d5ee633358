use sizer::{cli, logging};

pub fn main() -> anyhow::Result<()> {
    logging::setup_logging()?;
    cli::process_command()
}
