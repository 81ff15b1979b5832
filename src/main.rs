#![allow(clippy::cargo_common_metadata)]
use anyhow::Result;
use std::io;
use zabbix_maintenance::{api, cli, config::Config, setup_logging};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = cli::parse_args();

    // Setup logging based on debug flag
    setup_logging(args.debug)?;

    // Initialize configuration
    let config = Config::from_args(&args);

    // Execute the requested action against the server
    let code = cli::run(&config, &args, api::connect_http, &mut io::stdout().lock())?;
    std::process::exit(code)
}
