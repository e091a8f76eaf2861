use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flightpulse::cli::OutputFormat;
use flightpulse::cli::commands::dashboard::DashboardOptions;

/// Parse output format from string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "flightpulse")]
#[command(version, about = "Airline booking market dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Config file (skips global/project lookup)")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh and display the market dashboard
    Dashboard {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json"
        )]
        format: OutputFormat,
        #[arg(long, help = "Seed for generated data (reproducible output)")]
        seed: Option<u64>,
        #[arg(long, help = "Number of generated flight records")]
        records: Option<usize>,
        #[arg(long, value_name = "SECS", help = "Keep refreshing every SECS seconds")]
        watch: Option<u64>,
    },

    /// Show which external APIs are live and which use mock data
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_output_format,
            help = "Output format: text, json"
        )]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mFlightPulse encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config;

    match cli.command {
        Commands::Dashboard {
            format,
            seed,
            records,
            watch,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(flightpulse::cli::commands::dashboard::run(
                DashboardOptions {
                    config_path,
                    format,
                    seed,
                    records,
                    watch,
                },
            ))?;
        }
        Commands::Status { format } => {
            flightpulse::cli::commands::status::run(config_path.as_deref(), format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                flightpulse::cli::commands::config::show(config_path.as_deref(), &format)?;
            }
            ConfigAction::Path => {
                flightpulse::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                flightpulse::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
