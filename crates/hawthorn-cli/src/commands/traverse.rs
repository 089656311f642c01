//! Reachability commands

use clap::Args;
use serde::Serialize;

use crate::commands::node_key;
use crate::output::{format_json, OutputFormat, Table};
use crate::selector::NodeSelector;
use crate::AppContext;
use hawthorn_core::{NodeId, TraversalStats};

#[derive(Args)]
pub struct ConnectedArgs {
    /// Start node: id or key=value
    pub node: NodeSelector,

    /// Edge type name to follow
    #[arg(short = 't', long = "type")]
    pub edge_type: String,

    /// Also report visited node and traversed edge counts
    #[arg(long)]
    pub stats: bool,
}

#[derive(Args)]
pub struct ReachableArgs {
    /// Start node: id or key=value
    pub from: NodeSelector,

    /// Node to look for: id or key=value
    pub to: NodeSelector,

    /// Edge type name to follow
    #[arg(short = 't', long = "type")]
    pub edge_type: String,
}

#[derive(Serialize)]
struct Exploration<'a> {
    source: NodeId,
    edge_type: &'a str,
    nodes: &'a [NodeId],
    stats: TraversalStats,
}

#[derive(Serialize)]
struct Reachability<'a> {
    from: NodeId,
    to: NodeId,
    edge_type: &'a str,
    reachable: bool,
}

pub fn run_connected(args: &ConnectedArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let source = args.node.resolve(&ctx.db)?;
    let result = ctx.db.explore(source, &args.edge_type)?;
    let reached = &result.nodes;
    tracing::info!(
        "{} reaches {} nodes over {}",
        source,
        reached.len(),
        args.edge_type
    );

    match ctx.format {
        OutputFormat::Json if args.stats => {
            let output = Exploration {
                source,
                edge_type: &args.edge_type,
                nodes: reached,
                stats: result.stats,
            };
            println!("{}", format_json(&output)?);
        }
        OutputFormat::Json => println!("{}", format_json(reached)?),
        OutputFormat::Table => {
            let mut table = Table::new(["ID", "KEY"]);
            for id in reached {
                table.row([id.to_string(), node_key(&ctx.db, *id)?]);
            }
            print!("{}", table.render());
            if args.stats {
                println!();
                println!(
                    "Visited {} nodes, traversed {} edges",
                    result.stats.nodes_visited, result.stats.edges_traversed
                );
            }
        }
    }
    Ok(())
}

pub fn run_reachable(args: &ReachableArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let from = args.from.resolve(&ctx.db)?;
    let to = args.to.resolve(&ctx.db)?;
    let reachable = ctx.db.are_connected(from, to, &args.edge_type)?;

    match ctx.format {
        OutputFormat::Json => {
            let output = Reachability {
                from,
                to,
                edge_type: &args.edge_type,
                reachable,
            };
            println!("{}", format_json(&output)?);
        }
        OutputFormat::Table => {
            let verdict = if reachable { "reaches" } else { "does not reach" };
            println!("{} {} {} over {}", args.from, verdict, args.to, args.edge_type);
        }
    }
    Ok(())
}
