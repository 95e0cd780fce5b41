//! `wab generate` command - Write a synthetic order table as CSV

use chrono::NaiveDate;
use console::style;
use log::info;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::flatfile::write_orders;
use crate::core::{generate_orders, write_orders_file, GeneratorConfig};
use crate::entities::ProcessGroup;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Output CSV path ("-" for stdout)
    #[arg(long, short = 'o', default_value = "warehouse_orders.csv")]
    pub output: PathBuf,

    /// Number of days to simulate
    #[arg(long, default_value_t = 60)]
    pub days: u32,

    /// First order date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    pub start_date: NaiveDate,

    /// Minimum orders per day
    #[arg(long, default_value_t = 80)]
    pub min_orders: u32,

    /// Maximum orders per day (exclusive)
    #[arg(long, default_value_t = 120)]
    pub max_orders: u32,

    /// Random seed; the same seed always yields the same table
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Warehouse identifier written on every order
    #[arg(long, default_value = "WH_01")]
    pub warehouse: String,

    /// Number of pickers (P_1..P_n)
    #[arg(long, default_value_t = 20)]
    pub pickers: u32,
}

impl GenerateArgs {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            days: self.days,
            start_date: self.start_date,
            min_orders_per_day: self.min_orders,
            max_orders_per_day: self.max_orders,
            seed: self.seed,
            warehouse_id: self.warehouse.clone(),
            picker_count: self.pickers,
            ..GeneratorConfig::default()
        }
    }

    fn to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let orders = generate_orders(args.generator_config()).into_diagnostic()?;
    info!("generated {} orders with seed {}", orders.len(), args.seed);

    if args.to_stdout() {
        write_orders(&orders, io::stdout().lock()).into_diagnostic()?;
    } else {
        write_orders_file(&orders, &args.output).into_diagnostic()?;
    }

    let count_a = orders
        .iter()
        .filter(|o| o.process_group == ProcessGroup::A)
        .count();
    let count_b = orders.len() - count_a;

    match global.format {
        OutputFormat::Json if !args.to_stdout() => {
            let summary = serde_json::json!({
                "output": args.output.display().to_string(),
                "orders": orders.len(),
                "group_a": count_a,
                "group_b": count_b,
                "seed": args.seed,
            });
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
        }
        _ if global.quiet => {}
        _ => {
            let message = format!(
                "{} Sample data generated and saved to {} ({} orders: {} A, {} B)",
                style("✓").green(),
                style(if args.to_stdout() {
                    "stdout".to_string()
                } else {
                    args.output.display().to_string()
                })
                .cyan(),
                style(orders.len()).cyan(),
                count_a,
                count_b
            );
            // Keep stdout clean when the CSV itself goes there
            if args.to_stdout() {
                eprintln!("{}", message);
            } else {
                println!("{}", message);
            }
        }
    }

    Ok(())
}
