#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context;
use clap::Parser;
use rentix_client_core::get_configuration;
use rentix_console::{cli::Cli, ConsoleApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if let Err(e) = rentix_console::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let configuration =
        get_configuration(&args.config_dir).context("failed to read configuration")?;
    let mut app = ConsoleApp::new(&configuration)?;
    app.run(args.command).await
}
