use anyhow::Context;
use clap::Parser;

use cryptogap::adapter::inbound::cli::{command::Cli, dispatch, output};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = dispatch::execute(cli).await.context("cryptogap failed") {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}
