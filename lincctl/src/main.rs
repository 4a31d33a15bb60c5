use clap::{CommandFactory, Parser};
use lincctl::cli::{self, Cli};
use lincctl::{Config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.args)?;

    // If --validate flag is set, exit successfully after config validation
    if cli.args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    telemetry::init_telemetry(config.enable_otel_export)?;
    tracing::debug!(config = ?cli.args.config, "Starting");

    let result = cli::run(command, &config, cli.json).await;
    telemetry::shutdown_telemetry();

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}
