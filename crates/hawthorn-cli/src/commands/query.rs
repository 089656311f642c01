//! Query plan command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::commands::node_key;
use crate::output::{format_json, OutputFormat, Table};
use crate::selector::NodeSelector;
use crate::AppContext;
use hawthorn_db::QueryPlan;

#[derive(Args)]
pub struct QueryArgs {
    /// Query plan file (JSON)
    pub plan: PathBuf,

    /// Only report whether this node is in the result
    #[arg(long, value_name = "NODE")]
    pub contains: Option<NodeSelector>,
}

pub fn run(args: &QueryArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.plan)
        .with_context(|| format!("Failed to read query plan {}", args.plan.display()))?;
    let plan = QueryPlan::from_json(&json)
        .with_context(|| format!("Invalid query plan {}", args.plan.display()))?;
    tracing::debug!("Running query with {} steps", plan.steps.len());

    if let Some(selector) = &args.contains {
        let node = selector.resolve(&ctx.db)?;
        let found = ctx.db.contains(&plan, node)?;
        match ctx.format {
            OutputFormat::Json => println!("{}", format_json(&found)?),
            OutputFormat::Table => println!("{}", found),
        }
        return Ok(());
    }

    let results = ctx.db.run(&plan)?;
    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&results)?),
        OutputFormat::Table => {
            if results.is_empty() {
                println!("No matching nodes");
                return Ok(());
            }
            let mut table = Table::new(["ID", "KEY"]);
            for id in &results {
                table.row([id.to_string(), node_key(&ctx.db, *id)?]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
