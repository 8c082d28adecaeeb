use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxsync::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxsync::AppCommand {
    fn from(cmd: Commands) -> fxsync::AppCommand {
        match cmd {
            Commands::Once => fxsync::AppCommand::Once,
            Commands::Run => fxsync::AppCommand::Run,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Update the rate once and exit
    Once,
    /// Update the rate on a fixed interval until stopped
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxsync::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxsync::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
pair:
  base: USDT
  quote: TRX

# Pin the rate outright; providers are skipped while set.
# fixed_rate: 7.0

# Operator-supplied live rate, checked after fixed_rate.
# override_rate: 7.0

providers:
  okx:
    base_url: "https://www.okx.com"
  binance:
    base_url: "https://api.binance.com"

# web_proxy: "http://127.0.0.1:8080"

update_interval_secs: 60
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
