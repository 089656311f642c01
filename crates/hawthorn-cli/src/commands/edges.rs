//! Typed adjacency listing command

use clap::{Args, ValueEnum};

use crate::commands::node_key;
use crate::output::{format_json, OutputFormat, Table};
use crate::selector::NodeSelector;
use crate::AppContext;

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum Direction {
    /// Edges leaving the node
    #[default]
    Out,
    /// Edges arriving at the node
    In,
}

#[derive(Args)]
pub struct EdgesArgs {
    /// Node id or key=value
    pub node: NodeSelector,

    /// Edge type name
    #[arg(short = 't', long = "type")]
    pub edge_type: String,

    /// Which adjacency to list
    #[arg(short, long, value_enum, default_value = "out")]
    pub direction: Direction,
}

pub fn run(args: &EdgesArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let node = args.node.resolve(&ctx.db)?;
    let edges = match args.direction {
        Direction::Out => ctx.db.outbound(node, &args.edge_type)?,
        Direction::In => ctx.db.inbound(node, &args.edge_type)?,
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&edges)?),
        OutputFormat::Table => {
            if edges.is_empty() {
                println!("No {} edges", args.edge_type);
                return Ok(());
            }

            let mut table = Table::new(["ID", "SOURCE", "TARGET", "TYPE", "WEIGHT"]);
            for edge in &edges {
                table.row([
                    edge.id.to_string(),
                    format!("{} ({})", edge.source, node_key(&ctx.db, edge.source)?),
                    format!("{} ({})", edge.target, node_key(&ctx.db, edge.target)?),
                    edge.edge_type.clone(),
                    edge.weight.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
