use anyhow::{Context, Result};
use clap::Parser;
use nudb_cli::commands::{self, Cli};
use nudb_cli::telemetry;
use nudb_rs::Client;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = telemetry::init_telemetry(cli.log_dir.as_deref())?;

    let config = cli.client_config();
    let timeout = cli.request_timeout();
    let client = Client::from_config(&config);

    tracing::info!(
        endpoint = %client.connection().base_endpoint,
        db = %client.connection().db,
        "nudb client ready"
    );

    let reply = commands::run(&client, cli.command, timeout)
        .await
        .context("NuDB request failed")?;
    println!("{}", commands::render(&reply).context("Failed to render reply")?);

    telemetry::shutdown_telemetry();
    Ok(())
}
