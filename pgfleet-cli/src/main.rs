use anyhow::Result;
use clap::Parser;
use kube::Client;

use pgfleet_cli::{PgfleetCli, PgfleetCommands, commands};
use pgfleet_status::init_tracing;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_tracing("warn");

    // Ensure rustls uses the aws-lc-rs provider explicitly.
    // This avoids runtime errors when no default provider is set.
    if let Err(e) = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::aws_lc_rs::default_provider(),
    ) {
        tracing::debug!(
            ?e,
            "CryptoProvider already installed or incompatible; proceeding"
        );
    }

    let cli = PgfleetCli::parse();
    let client = Client::try_default().await?;

    match cli.command {
        PgfleetCommands::Status { cluster_name, opt } => {
            commands::run_status(client, &cluster_name, &opt).await
        }
    }
}
