use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use url::Url;

mod sub_commands;

const DEFAULT_BACKEND_URL: &str = "https://tknzbackend.onrender.com";

/// CLI to exercise the TKNZ minter against a live backend and a scripted chain
#[derive(Parser)]
#[command(name = "tknz-tool")]
#[command(version = "0.1.0")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Metadata backend base URL
    #[arg(short, long, env = "TKNZ_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend: Url,
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the backend to mitigate a cold start
    Wake,
    /// Prepare metadata for a piece of text without minting
    Prepare(sub_commands::prepare::PrepareSubCommand),
    /// Run a full mint attempt against a scripted chain and wallet
    Tokenize(sub_commands::tokenize::TokenizeSubCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    let default_filter = args.log_level;
    let hyper_filter = "hyper=warn";
    let env_filter = EnvFilter::new(format!("{},{}", default_filter, hyper_filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match &args.command {
        Commands::Wake => sub_commands::wake::wake(&args.backend).await,
        Commands::Prepare(sub_command_args) => {
            sub_commands::prepare::prepare(&args.backend, sub_command_args).await
        }
        Commands::Tokenize(sub_command_args) => {
            sub_commands::tokenize::tokenize(&args.backend, sub_command_args).await
        }
    }
}
