use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{config, export};
use review_export_models::Platform;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "review-export")]
#[command(about = "Export App Store and Google Play reviews to a spreadsheet")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output_format: output::OutputFormat,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a daily rotated file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Ios,
    Android,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Android => Platform::Android,
        }
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct ExportArgs {
    /// Workbook path, overrides output.file_path
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Only export these platforms (repeatable); defaults to every enabled platform
    #[arg(long, value_enum)]
    platform: Vec<PlatformArg>,

    /// Skip translation; the translated column repeats the review text
    #[arg(long, action = ArgAction::SetTrue)]
    no_translate: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch reviews for every enabled platform and write the workbook (default)
    #[command(long_about = "Fetch the most recent reviews from App Store Connect and Google Play, recover iOS app versions from the public storefront feed, translate review text and write one worksheet per platform.")]
    Export(ExportArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (masks sensitive data)
    #[command(long_about = "Display the configuration after environment overrides. Private keys and API secrets are masked. Use --full to show them.")]
    Show {
        /// Show full configuration including masked secrets
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Validate configuration and report every problem found
    Check,
}

/// Settings shared by every command
pub struct Context {
    pub config_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output_format, cli.quiet);
    let context = Context {
        config_path: cli.config,
    };

    match cli.command.unwrap_or_else(|| Commands::Export(ExportArgs::default())) {
        Commands::Export(args) => export::run_export(args, &context, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &context, &output).await,
    }
}
