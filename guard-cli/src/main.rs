//! Command-line front end for the CSMS input guard
//!
//! Reads JSON payloads from a file or stdin, sanitizes or validates them, and
//! prints the result as JSON on stdout. Logs go to stderr.

mod commands;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use csms_guard::{GuardConfig, Locale};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "csms-guard", version, about = "Sanitize and validate CSMS dashboard payloads")]
struct Cli {
    /// Language for validation messages (pt-BR or en); overrides GUARD_LOCALE
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip markup from every string in a JSON document
    Sanitize {
        /// JSON file to read (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Validate a JSON payload against a form or command schema
    Validate {
        #[arg(value_enum)]
        schema: SchemaName,

        /// JSON file to read (stdin when omitted)
        file: Option<PathBuf>,

        /// Strip markup from the validated payload before printing it
        #[arg(long)]
        sanitize: bool,
    },
    /// Print the canonical form of an http(s) URL
    Url { url: String },
    /// Check a single value against a format rule
    Check {
        #[arg(value_enum)]
        format: FormatName,
        value: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SchemaName {
    Login,
    Register,
    Voucher,
    User,
    Location,
    Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatName {
    Email,
    Password,
    Cep,
    Cnpj,
    Phone,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csms_guard=info,guard_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the input was accepted
fn run(cli: Cli) -> Result<bool> {
    let mut config = GuardConfig::from_env()?;
    if let Some(raw) = cli.locale.as_deref() {
        config.locale = raw.parse::<Locale>().map_err(|e| anyhow!(e))?;
    }
    debug!(locale = %config.locale, "configuration resolved");

    match cli.command {
        Commands::Sanitize { file } => commands::sanitize(&config, file.as_deref()),
        Commands::Validate {
            schema,
            file,
            sanitize,
        } => commands::validate(&config, schema, file.as_deref(), sanitize),
        Commands::Url { url } => Ok(commands::url(&url)),
        Commands::Check { format, value } => Ok(commands::check(format, &value)),
    }
}
