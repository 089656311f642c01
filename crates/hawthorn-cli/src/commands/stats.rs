//! Graph statistics command

use serde::Serialize;

use crate::output::{format_json, OutputFormat};
use crate::AppContext;
use hawthorn_db::DatabaseStats;

#[derive(Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: DatabaseStats,
    types: Vec<String>,
}

pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let output = StatsOutput {
        stats: ctx.db.stats()?,
        types: ctx.db.edge_types()?,
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&output)?),
        OutputFormat::Table => {
            println!("Nodes:      {}", output.stats.nodes);
            println!("Edges:      {}", output.stats.edges);
            println!("Edge types: {}", output.stats.edge_types);
            for name in &output.types {
                println!("  - {}", name);
            }
        }
    }
    Ok(())
}
