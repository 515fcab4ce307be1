use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

mod commands;
mod console;
mod options;
mod render;

#[derive(Parser)]
#[command(name = "case-coach")]
#[command(about = "Practice business case interviews with a language model", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    interview: InterviewArgs,

    /// Log debug details to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List case types and feedback styles
    List,
    /// Create a secret.json template in the config directory
    Init,
}

/// Options for an interview session (the default command).
#[derive(Args, Debug, Clone, Default)]
pub struct InterviewArgs {
    /// Case type label or slug, e.g. "Market Entry" or market-entry
    #[arg(short, long)]
    pub case_type: Option<String>,

    /// Feedback style: Bain-style, McKinsey-style, BCG-style (or bain, mckinsey, bcg)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Read candidate responses from a file, one per line; a blank line ends the interview
    #[arg(long, value_name = "FILE")]
    pub script: Option<std::path::PathBuf>,

    /// Response that ends the interview, in addition to a blank line
    #[arg(long, value_name = "TOKEN")]
    pub end_token: Option<String>,

    /// Model name, e.g. gpt-3.5-turbo
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{}", format!("case-coach error: {error:#}").red());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Some(Commands::List) => commands::list::handle(),
        Some(Commands::Init) => commands::init::handle(),
        None => commands::interview::handle(&cli.interview).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
