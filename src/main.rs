//! cloudtabs - interactive cloud console launcher
//!
//! Prompts for a cloud provider (and region for AWS), loads credentials
//! from `secrets.json`, signs into the provider's web console in a real
//! Chrome window and opens the common service pages as tabs. The process
//! then idles so the session stays alive; terminate it externally.

use clap::Parser;
use tracing::{error, info};

use cloudtabs::cli::Cli;
use cloudtabs::console::{self, CloudProvider};
use cloudtabs::secrets::Secrets;

#[tokio::main]
async fn main() {
    let _guard = cloudtabs::init_logging();

    info!("Starting cloudtabs");
    if let Some(dir) = cloudtabs::log_dir() {
        info!("Log files saved to: {}", dir.display());
    }

    if let Err(e) = run().await {
        error!("An error occurred: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Selection first, then credentials; the browser only launches once
    // the secrets file has loaded and parsed
    match cli.resolve_provider()? {
        CloudProvider::Aws => {
            let region = cli.resolve_region()?;
            let creds = Secrets::load(cli.secrets.as_deref())?.aws()?;
            console::aws::run(&creds, &region, cli.headless).await?;
        }
        CloudProvider::Azure => {
            let creds = Secrets::load(cli.secrets.as_deref())?.azure()?;
            console::azure::run(&creds, cli.headless).await?;
        }
    }

    Ok(())
}
