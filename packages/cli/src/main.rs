mod commands;
mod config;
mod media;
mod store;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    append, attach, check, init, render, AppendArgs, AttachArgs, CheckArgs, InitArgs, RenderArgs,
};

/// Folio CLI - block documents with uploaded assets
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a Folio workspace
    Init(InitArgs),

    /// Validate snapshot files
    Check(CheckArgs),

    /// Print a document outline
    Render(RenderArgs),

    /// Append a block to a document
    Append(AppendArgs),

    /// Upload a local file into a media block
    Attach(AttachArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Check(args) => check(args, &cwd),
                Command::Render(args) => render(args, &cwd),
                Command::Append(args) => append(args, &cwd),
                Command::Attach(args) => attach(args, &cwd).await,
            }
        }
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
