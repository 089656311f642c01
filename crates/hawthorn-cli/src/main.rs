//! Hawthorn CLI - Inspect and query graphs loaded from JSON seed files

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;
mod seed;
mod selector;

use commands::{completions, config as config_cmd, edges, nodes, query, stats, traverse};
use config::Config;
use hawthorn_db::Database;
use output::OutputFormat;
use seed::SeedData;

#[derive(Parser)]
#[command(name = "hawthorn")]
#[command(author, version, about = "Radix-indexed in-memory graph store")]
pub struct Cli {
    /// Graph file to load (JSON seed)
    #[arg(short, long, global = true, env = "HAWTHORN_GRAPH")]
    pub graph: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show node, edge and edge type counts
    Stats,
    /// List nodes
    Nodes(nodes::NodesArgs),
    /// List the typed edges of one node
    Edges(edges::EdgesArgs),
    /// List every node reachable from a node
    Connected(traverse::ConnectedArgs),
    /// Check whether one node reaches another
    Reachable(traverse::ReachableArgs),
    /// Run a query plan from a JSON file
    Query(query::QueryArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the loaded graph
pub struct AppContext {
    pub db: Database,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let path = cli
            .graph
            .clone()
            .or_else(|| config.default_graph.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No graph file. Pass --graph or run `hawthorn config set default_graph <file>`"
                )
            })?;
        tracing::debug!("Loading graph from: {:?}", path);

        let db = SeedData::read(&path)?.load(config.default_weight)?;
        let format = OutputFormat::from(cli.format.as_deref().unwrap_or(&config.format));

        Ok(Self { db, format })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting hawthorn CLI");

    match &cli.command {
        Commands::Config(args) => return config_cmd::run(args),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load();
    let ctx = AppContext::new(&cli, &config)?;

    match &cli.command {
        Commands::Stats => stats::run(&ctx)?,
        Commands::Nodes(args) => nodes::run(args, &ctx)?,
        Commands::Edges(args) => edges::run(args, &ctx)?,
        Commands::Connected(args) => traverse::run_connected(args, &ctx)?,
        Commands::Reachable(args) => traverse::run_reachable(args, &ctx)?,
        Commands::Query(args) => query::run(args, &ctx)?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
