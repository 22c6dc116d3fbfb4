use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Run without touching the network, serving cached rates only
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                fxconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { base } => fxconv::AppCommand::Rates { base },
            Commands::Currencies { query } => fxconv::AppCommand::Currencies { query },
            Commands::Interactive => fxconv::AppCommand::Interactive,
            Commands::ClearCache => fxconv::AppCommand::ClearCache,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    /// Show the full rate table against a base currency
    Rates {
        /// Base currency; defaults to the provider's base
        base: Option<String>,
    },
    /// List known currencies, optionally filtered
    Currencies { query: Option<String> },
    /// Start an interactive conversion session
    Interactive,
    /// Drop cached rates from local storage
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => {
            fxconv::run_command(
                cmd.into(),
                fxconv::RunOptions {
                    config_path: cli.config_path,
                    offline: cli.offline,
                },
            )
            .await
        }
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

    let path = fxconv::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider: vatcomply

providers:
  vatcomply:
    base_url: "https://api.vatcomply.com"
  fxrates:
    base_url: "https://api.fxratesapi.com"

# Formatting locale, e.g. en-US, de-DE, fr-FR, en-IN
# locale: "en-US"

cache_ttl_secs: 300

defaults:
  from: "USD"
  to: "EUR"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
