use anomdash::cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON and the TUI owns the screen, so logs go to stderr
    // and stay off by default while the TUI runs
    let default_filter = if cli.is_interactive() {
        "anomdash=off"
    } else {
        "anomdash=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
