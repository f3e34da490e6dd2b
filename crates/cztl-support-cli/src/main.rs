use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cztl_support::escalation::ADVANCED_SUPPORT_URL;

mod commands {
    pub mod ask;
    pub mod session;
    pub mod version;
}
mod prompt;
mod session;

#[derive(Parser)]
#[command(author, about, long_about = None)]
struct Cli {
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Completion provider (gemini, open-ai or mock)
    #[arg(short, long, default_value = "gemini")]
    #[arg(value_enum)]
    provider: CliProviderVariant,

    /// Provider API key (falls back to GEMINI_API_KEY or OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model override for the selected provider
    #[arg(short, long)]
    model: Option<String>,

    /// Tera template used instead of the bundled assistant instructions
    #[arg(long)]
    instructions: Option<PathBuf>,

    /// Where the advanced support command sends the user
    #[arg(long, env = "CZTL_SUPPORT_URL", default_value = ADVANCED_SUPPORT_URL)]
    support_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum CliProviderVariant {
    Gemini,
    OpenAi,
    Mock,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive support chat
    Session,

    /// Ask a single question and print the reply
    Ask {
        /// The message to send
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.version {
        return commands::version::execute().await;
    }

    match &cli.command {
        Some(Command::Ask { message }) => commands::ask::execute(&cli, message).await,
        Some(Command::Session) | None => commands::session::execute(&cli).await,
    }
}
