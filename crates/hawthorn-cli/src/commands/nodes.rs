//! Node listing command

use clap::Args;

use crate::output::{format_json, OutputFormat, Table};
use crate::seed::SEED_KEY_PROPERTY;
use crate::AppContext;
use hawthorn_core::RESERVED_ID_KEY;
use hawthorn_db::NodeRecord;

#[derive(Args)]
pub struct NodesArgs {
    /// Only nodes whose property matches (key=value)
    #[arg(short = 'w', long = "where", value_name = "KEY=VALUE")]
    pub filter: Option<String>,
}

pub fn run(args: &NodesArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let ids = match &args.filter {
        Some(filter) => {
            let (key, value) = filter
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Expected key=value, got '{}'", filter))?;
            ctx.db.find(key, value)?
        }
        None => ctx.db.all_nodes()?,
    };
    tracing::debug!("Listing {} nodes", ids.len());

    let mut records: Vec<NodeRecord> = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = ctx.db.node(id)? {
            records.push(record);
        }
    }

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&records)?),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No nodes found");
                return Ok(());
            }

            let mut table = Table::new(["ID", "KEY", "PROPERTIES"]);
            for record in &records {
                let properties: Vec<String> = record
                    .properties
                    .iter()
                    .filter(|(k, _)| k != RESERVED_ID_KEY && k != SEED_KEY_PROPERTY)
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                table.row([
                    record.id.to_string(),
                    record.property(SEED_KEY_PROPERTY).unwrap_or("-").to_string(),
                    properties.join(", "),
                ]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
