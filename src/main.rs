use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod github;
mod notes;
mod parser;
mod push;
mod salesforce;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Task outcomes log at info; --verbose adds queries and API calls
    let filter = if cli.verbose {
        EnvFilter::new("releasekit=debug")
    } else {
        EnvFilter::new("releasekit=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::PushFails(args) => cli::push_fails::execute(args, &cli.config).await,
        Commands::ReleaseNotes(args) => cli::release_notes::execute(args, &cli.config).await,
        Commands::ParentNotes(args) => cli::parent_notes::execute(args, &cli.config).await,
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
