mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prompt_architect::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let mut session = cli::commands::Session::open(config, cli.config.as_deref());

    if let Err(err) = cli::commands::dispatch(&mut session, cli.command, cli.pretty).await {
        cli::commands::report_error(&err, cli.pretty);
        std::process::exit(1);
    }
    Ok(())
}
