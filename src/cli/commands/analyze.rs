//! `wab analyze` command - Static A/B comparison report

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::analysis::{AnalysisReport, Metric};
use crate::cli::commands::load_table;
use crate::cli::helpers::write_file;
use crate::cli::page::PageRenderer;
use crate::cli::render::analysis_text;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Also write the report as an HTML page
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Skip the terminal charts
    #[arg(long)]
    pub no_charts: bool,

    /// Number of rows to preview (0 to skip)
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let table = load_table(config)?;
    let report = AnalysisReport::build(&table, &Metric::ALL);

    if let Some(path) = &args.html {
        let renderer = PageRenderer::new().map_err(|e| miette::miette!("{}", e))?;
        let html = renderer
            .analysis_page(&report, config.alpha)
            .map_err(|e| miette::miette!("{}", e))?;
        write_file(&html, path)?;
        if !global.quiet && global.format != OutputFormat::Json {
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "alpha": config.alpha,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            let preview = if global.quiet { 0 } else { args.preview };
            print!(
                "{}",
                analysis_text(&table, &report, config.alpha, preview, !args.no_charts)
            );
        }
    }

    Ok(())
}
