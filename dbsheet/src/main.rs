//! MySQL schema to XLSX export tool.
//!
//! Connects to a MySQL server, reads table and column metadata from
//! `information_schema`, and writes one workbook with a worksheet per
//! table. One-shot: connect, read, write, exit.

use clap::{Args, Parser, Subcommand};
use dbsheet::config::ExportConfig;
use dbsheet::export;
use dbsheet_core::{DbsheetError, Result, init_logging};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbsheet")]
#[command(about = "Export MySQL database structure to an XLSX workbook")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export database structure to an XLSX workbook
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Database login name
    #[arg(short = 'u', long)]
    username: String,

    /// Prompt for a password (masked input); otherwise the password is empty
    #[arg(short = 'p', long)]
    password: bool,

    /// Schema/database name to introspect
    #[arg(short = 'D', long)]
    database: String,

    /// Database host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Database port
    #[arg(short = 'P', long, default_value_t = 3306)]
    port: u16,

    /// Destination XLSX path
    #[arg(short = 'o', long)]
    output_file: PathBuf,

    /// Only export the named tables (repeatable or comma-separated)
    #[arg(long, value_delimiter = ',')]
    table: Vec<String>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        report(&error);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.global.verbose, cli.global.quiet)?;

    match cli.command {
        Command::Export(args) => {
            let config = build_config(args)?;
            export::run_export(&config).await
        }
    }
}

fn build_config(args: ExportArgs) -> Result<ExportConfig> {
    let password = if args.password {
        Some(prompt_password()?)
    } else {
        None
    };

    Ok(ExportConfig {
        username: args.username,
        password,
        database: args.database,
        host: args.host,
        port: args.port,
        output_file: args.output_file,
        tables: args.table,
    })
}

fn prompt_password() -> Result<String> {
    print!("Enter password: ");
    io::stdout().flush().map_err(|e| {
        DbsheetError::configuration(format!(
            "failed to flush stdout before reading password: {}",
            e
        ))
    })?;
    rpassword::read_password()
        .map_err(|e| DbsheetError::configuration(format!("failed to read password: {}", e)))
}

/// Single fatal-error reporting path: one error line plus its cause chain.
fn report(error: &DbsheetError) {
    eprintln!("Error: {}", error);
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("Caused by: {}", cause);
        source = cause.source();
    }
}
