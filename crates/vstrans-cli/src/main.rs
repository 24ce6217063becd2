//! vstrans CLI
//!
//! Command-line interface for translating FHIR ValueSets into CodeSystem supplements

mod commands;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::error;
use vstrans_core::{EngineKind, FailurePolicy, init_tracing};

#[derive(Parser)]
#[command(name = "vstrans")]
#[command(about = "Translate FHIR ValueSet expansions into CodeSystem supplements")]
#[command(version = vstrans_core::VERSION)]
#[command(
    long_about = "vstrans resolves FHIR ValueSet expansions (local files or a terminology server),\n\
translates every concept display into the configured target languages and writes one\n\
CodeSystem supplement per ValueSet.\n\
\n\
Examples:\n  \
vstrans translate --value-sets valueSets.json --dry-run      # Count characters only\n  \
vstrans translate --value-sets valueSets.json --engine cloud # Translate with DeepL\n  \
vstrans list --value-sets-folder value-sets                  # Generate a default list"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.vstransrc.json/.vstransrc.toml)"
    )]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, alias = "log_level", global = true, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Verbose output (overrides --log-level; can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate the ValueSets of a list into CodeSystem supplements
    Translate(TranslateArgs),

    /// Generate a value-set list from a folder of ValueSet files
    List {
        /// Folder with ValueSet JSON files
        #[arg(long, alias = "value_sets_folder", default_value = "value-sets")]
        value_sets_folder: PathBuf,

        /// Where to write the list
        #[arg(short, long, default_value = "valueSets.default.json")]
        output: PathBuf,

        /// Source language assigned to every entry
        #[arg(long, default_value = "de")]
        source_lang: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// File with the urls and languages
    #[arg(long, alias = "value_sets")]
    pub value_sets: PathBuf,

    /// The terminology server address
    #[arg(long, alias = "terminology_server", env = "TERMINOLOGY_SERVER")]
    pub terminology_server: Option<String>,

    /// Client certificate (PEM) for the terminology server
    #[arg(long, alias = "server_certificate")]
    pub server_certificate: Option<PathBuf>,

    /// Private key (PEM) for the client certificate
    #[arg(long, alias = "private_key")]
    pub private_key: Option<PathBuf>,

    /// API key for the cloud translation engine
    #[arg(long, alias = "deepl_api_key", env = "DEEPL_API_KEY", hide_env_values = true)]
    pub deepl_api_key: Option<String>,

    /// Folder to output the translated files to
    #[arg(long, alias = "target_folder")]
    pub target_folder: Option<PathBuf>,

    /// Number of concepts sent to the engine in one call
    #[arg(long, alias = "batch_size")]
    pub batch_size: Option<usize>,

    /// Do not translate, only count characters that would be translated
    #[arg(long, alias = "dry_run")]
    pub dry_run: bool,

    /// Target languages, in designation order
    #[arg(long, value_delimiter = ',')]
    pub target_langs: Option<Vec<String>>,

    /// Translation engine
    #[arg(long, value_parser = parse_engine)]
    pub engine: Option<EngineKind>,

    /// What to do when translating or saving a ValueSet fails
    #[arg(long, value_parser = parse_policy)]
    pub on_engine_error: Option<FailurePolicy>,

    /// CodeSystem template (defaults to the built-in template)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Notset,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Notset => "vstrans=trace",
            LogLevel::Debug => "vstrans=debug",
            LogLevel::Info => "vstrans=info",
            LogLevel::Warning => "vstrans=warn",
            LogLevel::Error | LogLevel::Critical => "vstrans=error",
        }
    }
}

fn parse_engine(s: &str) -> Result<EngineKind, String> {
    s.parse().map_err(|e: vstrans_core::TranslateError| e.to_string())
}

fn parse_policy(s: &str) -> Result<FailurePolicy, String> {
    s.parse().map_err(|e: vstrans_core::TranslateError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let log_filter = match cli.verbose {
        0 => cli.log_level.filter(),
        1 => "vstrans=debug",
        _ => "vstrans=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_filter);
    }
    init_tracing();

    let result = match cli.command {
        Some(Commands::Translate(args)) => {
            commands::translate::translate_command(args, cli.config).await
        }
        Some(Commands::List {
            value_sets_folder,
            output,
            source_lang,
        }) => commands::list::list_command(&value_sets_folder, &output, &source_lang),
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            return Ok(());
        }
    };

    if let Err(e) = result {
        error!("vstrans failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
