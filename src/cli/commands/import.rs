//! `wab import` command - Load an order CSV into the order store

use console::style;
use log::info;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::ORDERS_TABLE;
use crate::core::{read_orders_file, Config, OrderStore};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Order CSV produced by `wab generate`
    #[arg(default_value = "warehouse_orders.csv")]
    pub file: PathBuf,

    /// Keep existing orders instead of replacing them
    #[arg(long)]
    pub append: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    if !args.file.exists() {
        return Err(miette::miette!("File not found: {}", args.file.display()));
    }

    let orders = read_orders_file(&args.file).into_diagnostic()?;

    let mut store = OrderStore::create(&config.db_path, config.credential.as_ref()).into_diagnostic()?;
    let written = store.replace_orders(&orders, args.append).into_diagnostic()?;
    let (removed, inserted) = (written.removed, written.inserted);
    let total = store.count_orders().into_diagnostic()?;
    drop(store);

    info!(
        "imported {} orders into {} ({} replaced)",
        inserted,
        config.db_path.display(),
        removed
    );

    match global.format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "store": config.db_path.display().to_string(),
                "table": ORDERS_TABLE,
                "inserted": inserted,
                "replaced": removed,
                "total": total,
            });
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
        }
        OutputFormat::Auto if global.quiet => {}
        OutputFormat::Auto => {
            println!(
                "{} Data loaded into {} table '{}' ({} orders{})",
                style("✓").green(),
                style(config.db_path.display()).cyan(),
                ORDERS_TABLE,
                style(total).cyan(),
                if args.append {
                    format!(", {} appended", inserted)
                } else {
                    String::new()
                }
            );
        }
    }

    Ok(())
}
