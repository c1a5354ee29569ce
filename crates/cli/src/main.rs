use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use nordbook::driver::cdp::CdpDriver;
use nordbook::{BookingService, DriverOptions, SiteConfig};
use tracing::error;

mod cli;
mod commands;
mod logging;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let site = match load_site_config(cli.config.as_deref()) {
        Ok(site) => site,
        Err(err) => {
            error!(target = "nordbook.cli", error = %err, "invalid site configuration");
            std::process::exit(1);
        }
    };

    let options = DriverOptions {
        headless: !cli.headful,
        executable: cli.chrome.clone(),
        ..DriverOptions::default()
    };
    let service = BookingService::new(Arc::new(CdpDriver::new(options)), site);

    let outcome = commands::dispatch(cli.command, &service).await;

    if let Err(err) = service.shutdown().await {
        error!(target = "nordbook.cli", error = %err, "browser shutdown failed");
    }

    if let Err(err) = outcome {
        error!(target = "nordbook.cli", error = %err, "command failed");
        std::process::exit(1);
    }
}

fn load_site_config(path: Option<&Path>) -> nordbook::Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::from_file(path),
        None => Ok(SiteConfig::default()),
    }
}
