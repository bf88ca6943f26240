//! # ncprov CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use ncprov_cli::add::{run_add, AddArgs};
use ncprov_cli::setting::{run_setting, SettingArgs};
use ncprov_cli::validate::{run_validate, ValidateArgs};
use ncprov_cli::welcome::{run_welcome, WelcomeArgs};
use ncprov_cli::EXIT_ABORTED;

/// Bulk-provision Nextcloud users from a JSON file.
///
/// Every record is validated before anything is sent. Credentials are read
/// from NEXTCLOUD_USER / NEXTCLOUD_PASSWORD or prompted for.
#[derive(Parser, Debug)]
#[command(name = "ncprov", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create every user in the file through the OCS API.
    Add(AddArgs),

    /// Send the welcome email to every user in the file.
    Welcome(WelcomeArgs),

    /// Print an `occ user:setting` command for every user in the file.
    Setting(SettingArgs),

    /// Check the file without contacting a server.
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!("ncprov v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Add(args) => run_add(args).await,
        Commands::Welcome(args) => run_welcome(args).await,
        Commands::Setting(args) => run_setting(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            if tracing::enabled!(Level::ERROR) {
                tracing::error!("{e:#}");
            } else {
                // Logging is filtered off; the abort must still be visible.
                let _ = write_fatal(&mut std::io::stderr(), &e);
            }
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

fn write_fatal(out: &mut impl Write, e: &anyhow::Error) -> std::io::Result<()> {
    writeln!(out, "error: {e:#}")
}

/// Initialize tracing on stderr. `RUST_LOG` applies only without `-v`.
fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
