//! overview - Rubin documentation architecture overview diagram

mod overview_cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "overview")]
#[command(about = "Render the documentation architecture overview diagram", version)]
struct Cli {
    #[command(flatten)]
    args: overview_cli::OverviewArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    overview_cli::run(cli.args)
}
