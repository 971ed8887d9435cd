use anyhow::Context;
use clap::Parser;
use lookout::cli::{Cli, Commands};
use lookout::logging::{init_logging, LogConfig};
use lookout::output;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_flags(cli.verbose, cli.quiet));

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let what = match &cli.command {
        Commands::Scan(cmd) => format!("scan of {}", cmd.target),
        Commands::Headers(cmd) => format!("header probe of {}:{}", cmd.target, cmd.port),
    };

    cli.execute().await.with_context(|| format!("{} failed", what))
}
