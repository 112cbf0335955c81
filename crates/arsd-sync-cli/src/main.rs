//! ARSD Sync command-line entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use arsd_sync_cli::cli::show_cmd::Record;
use arsd_sync_cli::cli::sync_cmd::SyncArgs;
use arsd_sync_cli::cli::{logout, show_cmd, status, sync_cmd};
use arsd_sync_cli::config::{resolve_config_path, resolve_store_path};

#[derive(Parser)]
#[command(
    name = "arsd-sync",
    about = "Sync your ARSD College student records: profile, mentor, attendance, and faculty",
    version
)]
struct Cli {
    /// Path to the record store.
    #[arg(short, long, global = true)]
    store: Option<String>,

    /// Path to a JSON config file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the portal and fetch every record.
    ///
    /// Without --roll, --name and --dob the stored credentials are used.
    Sync {
        /// College roll number.
        #[arg(long)]
        roll: Option<String>,

        /// Full name as registered with the college.
        #[arg(long)]
        name: Option<String>,

        /// Date of birth, DD-MM-YYYY.
        #[arg(long)]
        dob: Option<String>,

        /// Show the browser window.
        #[arg(long)]
        headful: bool,

        /// Give up after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Chromium binary to use.
        /// Also reads from ARSD_CHROMIUM_PATH env var.
        #[arg(long)]
        chromium: Option<PathBuf>,

        /// No spinner.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a stored record as JSON.
    Show {
        record: Record,
    },

    /// Show credential and data age.
    Status {
        /// Machine-readable output.
        #[arg(long)]
        json: bool,
    },

    /// Remove stored credentials and records.
    Logout,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   arsd-sync completions bash > ~/.local/share/bash-completion/completions/arsd-sync
    ///   arsd-sync completions zsh > ~/.zfunc/_arsd-sync
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store_path = resolve_store_path(cli.store.as_deref());

    match cli.command {
        Commands::Sync {
            roll,
            name,
            dob,
            headful,
            timeout,
            chromium,
            quiet,
        } => {
            let config_path = resolve_config_path(cli.config.as_deref());
            let args = SyncArgs {
                roll,
                name,
                dob,
                headful,
                timeout,
                chromium,
                quiet,
            };
            let outcome = sync_cmd::run(&store_path, &config_path, args).await?;
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Show { record } => {
            if !show_cmd::run(&store_path, record)? {
                std::process::exit(1);
            }
        }

        Commands::Status { json } => {
            status::run(&store_path, json)?;
        }

        Commands::Logout => {
            logout::run(&store_path)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "arsd-sync", &mut std::io::stdout());
        }
    }

    Ok(())
}
