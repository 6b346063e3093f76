mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clubsheets_lib::{ClubData, SheetsConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "clubsheets")]
#[command(about = "Inspect the club spreadsheet: members, accounts, dues and sign-ins")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML config file; CLUBSHEETS_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List members (only those with an account, unless --all)
    Members(commands::members::MembersArgs),
    /// List accounts
    Accounts(commands::accounts::AccountsArgs),
    /// List overdue fees
    Overdue(commands::overdue::OverdueArgs),
    /// List pool sign-ins
    Signins(commands::signins::SignInsArgs),
    /// Show one member's account and dues
    Account(commands::account::AccountArgs),
    /// Find the member who lists an email address
    Lookup(commands::lookup::LookupArgs),
    /// Validate configuration and fetch every dataset once
    Check,
}

fn load_config(path: Option<&PathBuf>) -> Result<SheetsConfig> {
    let mut config = match path {
        Some(path) => SheetsConfig::from_file(path)?,
        None => SheetsConfig::new("", ""),
    };
    config.apply_env()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clubsheets=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;

    let config = load_config(cli.config.as_ref()).context("loading configuration")?;
    let data = ClubData::from_config(&config)?;

    match &cli.command {
        Commands::Members(args) => commands::members::run(args, &data, &format).await?,
        Commands::Accounts(args) => commands::accounts::run(args, &data, &format).await?,
        Commands::Overdue(args) => commands::overdue::run(args, &data, &format).await?,
        Commands::Signins(args) => commands::signins::run(args, &data, &format).await?,
        Commands::Account(args) => commands::account::run(args, &data, &format).await?,
        Commands::Lookup(args) => commands::lookup::run(args, &data, &format).await?,
        Commands::Check => commands::check::run(&data, &format).await?,
    }

    Ok(())
}
