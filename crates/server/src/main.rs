//! SkillHub
//!
//! Development server and command-line client for the skills registry.
//! `serve` hosts the embedded frontend and proxies backend paths; the other
//! subcommands render the listing and detail views in the terminal.

mod assets;
mod cli;
mod config;
mod dev_server;
mod export;
mod logging;

use clap::{Parser, Subcommand};
use config::{BackendArgs, ExportArgs, ServeArgs, ServeConfig};
use skillhub_core::client::SkillsClient;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(author, version, about = "SkillHub - browse and serve a skills registry")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,

    #[command(flatten)]
    backend: BackendArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the development server (default)
    Serve(ServeArgs),
    /// Write the embedded frontend bundle to the build output directory
    Export(ExportArgs),
    /// List skills, optionally filtered by a search query
    List {
        query: Option<String>,
    },
    /// Show one skill's detail
    Show {
        name: String,
    },
    /// Print the Markdown rendering of a skill
    Markdown {
        name: String,
    },
    /// Print the registry guide
    Guide,
    /// Download a skill as a ZIP archive
    Download {
        name: String,
        /// Output file (defaults to <name>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve a client URL and render its view
    Open {
        url: String,
        /// History base the client is mounted under
        #[arg(long, default_value = "/")]
        base: String,
    },
    /// Show which route a client URL resolves to
    Route {
        url: String,
        #[arg(long, default_value = "/")]
        base: String,
    },
}

async fn run(args: Args) -> anyhow::Result<()> {
    let backend = args.backend;
    let client = || SkillsClient::new(backend.client_config());

    let command = match args.command {
        Some(command) => command,
        None => CliCommand::Serve(ServeArgs::from_env()?),
    };

    match command {
        CliCommand::Serve(serve) => {
            println!("╔══════════════════════════════════════╗");
            println!("║         SKILLHUB DEV SERVER          ║");
            println!("╚══════════════════════════════════════╝");
            let config = ServeConfig::from_args(&serve, &backend)?;
            dev_server::run(config).await
        }
        CliCommand::Export(export_args) => {
            let build = export_args.build_config();
            let written = export::export_assets(&build).await?;
            println!("Wrote {} files to {}", written, build.out_dir.display());
            Ok(())
        }
        CliCommand::List { query } => cli::list(&client()?, query.as_deref()).await,
        CliCommand::Show { name } => cli::show(&client()?, &name).await,
        CliCommand::Markdown { name } => cli::markdown(&client()?, &name).await,
        CliCommand::Guide => cli::guide(&client()?).await,
        CliCommand::Download { name, output } => cli::download(&client()?, &name, output).await,
        CliCommand::Open { url, base } => cli::open(client()?, &base, &url).await,
        CliCommand::Route { url, base } => cli::route(&base, &url),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_logging(logging::level_for(args.verbose))?;

    run(args).await
}
