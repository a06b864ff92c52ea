use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use hotel_block_watch::{config::Args, BrowserAlert, PortalClient, Poller, SystemBrowser};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so the room table owns stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_block_watch=info".into()),
        )
        .init();

    let args = Args::parse();
    let dates = args.search_dates();
    info!(
        check_in = %dates.check_in,
        check_out = %dates.check_out,
        "searching hotel blocks"
    );

    let portal_config = args.portal_config();
    let alert = BrowserAlert::new(args.browser, portal_config.start_url());
    let client =
        PortalClient::new(portal_config, dates).context("failed to build portal HTTP client")?;

    let mut poller = Poller::new(client, args.filter_config(), args.interval())
        .with_browser(alert, Box::new(SystemBrowser));
    poller.run_forever().await;

    Ok(())
}
