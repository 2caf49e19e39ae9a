use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use odcli::{check::CheckHandler, ctx::AppContext, menuconfig::MenuConfigHandler, settings::Settings};
use odconfig::prompt::TermPrompt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the CLI settings file
    #[arg(short, long, default_value = "odcli.toml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit config files interactively
    Edit {
        /// Config files to edit, defaults to every configured file
        configs: Vec<PathBuf>,
    },
    /// Validate config files against their schemas
    Check {
        /// Config files to check, defaults to every configured file
        configs: Vec<PathBuf>,
    },
    /// Print the JSON schema of the settings file
    SettingsSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Edit { configs } => {
            let ctx = AppContext::new(&cli.settings).await?;
            if let Some(warning) = TermPrompt::size_warning() {
                eprintln!("{}", warning.red().bold());
                return Ok(ExitCode::FAILURE);
            }
            MenuConfigHandler::handle_menuconfig(&ctx, &configs).await?;
        }
        Commands::Check { configs } => {
            let ctx = AppContext::new(&cli.settings).await?;
            let errors = CheckHandler::handle_check(&ctx, &configs).await?;
            if errors > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::SettingsSchema => {
            let schema = schemars::schema_for!(Settings);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
