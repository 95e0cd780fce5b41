//! `wab dashboard` command - Interactive A/B dashboard
//!
//! The full table is loaded once. Each change to the group filter or metric
//! recomputes the view from scratch and redraws the terminal page; when
//! `--html` is given the page file is rewritten on every change too.

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, MultiSelect, Select};
use log::debug;
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::analysis::{compute, DashboardView, Metric, Selection};
use crate::cli::commands::load_table;
use crate::cli::helpers::write_file;
use crate::cli::page::PageRenderer;
use crate::cli::render::dashboard_text;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::ProcessGroup;

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// Initial group filter: "A,B", "A", "B", "all" or "none"
    #[arg(long, default_value = "all", value_parser = parse_groups)]
    pub groups: GroupFilter,

    /// Initial metric
    #[arg(long, short = 'm', value_enum, default_value = "time")]
    pub metric: Metric,

    /// Keep an HTML copy of the dashboard at this path
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Render once and exit
    #[arg(long)]
    pub no_interactive: bool,
}

/// Parsed `--groups` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFilter(pub BTreeSet<ProcessGroup>);

fn parse_groups(s: &str) -> Result<GroupFilter, String> {
    match s.trim().to_lowercase().as_str() {
        "all" => return Ok(GroupFilter(ProcessGroup::ALL.into_iter().collect())),
        "none" | "" => return Ok(GroupFilter(BTreeSet::new())),
        _ => {}
    }
    s.split(',')
        .map(|part| {
            part.trim()
                .to_uppercase()
                .parse::<ProcessGroup>()
                .map_err(|e| e.to_string())
        })
        .collect::<Result<BTreeSet<_>, _>>()
        .map(GroupFilter)
}

/// Next step chosen at the prompt
enum Action {
    Groups,
    Metric,
    Quit,
}

pub fn run(args: DashboardArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let table = load_table(config)?;
    let mut selection = Selection {
        groups: args.groups.0.clone(),
        metric: args.metric,
    };

    let renderer = match &args.html {
        Some(_) => Some(PageRenderer::new().map_err(|e| miette::miette!("{}", e))?),
        None => None,
    };

    let term = Term::stdout();
    let interactive = !args.no_interactive && global.format != OutputFormat::Json && term.is_term();

    if !interactive {
        let view = compute(&table, &selection);
        if let (Some(renderer), Some(path)) = (&renderer, &args.html) {
            write_page(renderer, &view, config.alpha, path)?;
        }
        match global.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "alpha": config.alpha,
                    "dashboard": view,
                });
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            }
            OutputFormat::Auto => print!("{}", dashboard_text(&view, config.alpha)),
        }
        return Ok(());
    }

    let theme = ColorfulTheme::default();
    loop {
        let view = compute(&table, &selection);
        debug!(
            "dashboard refresh: groups={} metric={} rows={}",
            selection.groups_label(),
            selection.metric,
            view.report.row_count
        );

        term.clear_screen().into_diagnostic()?;
        print!("{}", dashboard_text(&view, config.alpha));
        if let (Some(renderer), Some(path)) = (&renderer, &args.html) {
            write_page(renderer, &view, config.alpha, path)?;
            println!(
                "{} {}",
                style("HTML dashboard:").dim(),
                style(path.display()).cyan()
            );
        }
        println!();

        match prompt_action(&theme)? {
            Action::Groups => selection.groups = prompt_groups(&theme, &selection)?,
            Action::Metric => selection.metric = prompt_metric(&theme, selection.metric)?,
            Action::Quit => break,
        }
    }

    Ok(())
}

fn write_page(renderer: &PageRenderer, view: &DashboardView, alpha: f64, path: &Path) -> Result<()> {
    let html = renderer
        .dashboard_page(view, alpha)
        .map_err(|e| miette::miette!("{}", e))?;
    write_file(&html, path)
}

fn prompt_action(theme: &ColorfulTheme) -> Result<Action> {
    let items = ["Filter by Process Group", "Select Metric to Display", "Quit"];
    let choice = Select::with_theme(theme)
        .with_prompt("Next")
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;
    Ok(match choice {
        0 => Action::Groups,
        1 => Action::Metric,
        _ => Action::Quit,
    })
}

fn prompt_groups(theme: &ColorfulTheme, selection: &Selection) -> Result<BTreeSet<ProcessGroup>> {
    let labels: Vec<String> = ProcessGroup::ALL
        .iter()
        .map(|g| format!("Process {}", g))
        .collect();
    let defaults: Vec<bool> = ProcessGroup::ALL
        .iter()
        .map(|&g| selection.includes(g))
        .collect();

    let picked = MultiSelect::with_theme(theme)
        .with_prompt("Filter by Process Group (space to toggle)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .into_diagnostic()?;

    Ok(picked.into_iter().map(|i| ProcessGroup::ALL[i]).collect())
}

fn prompt_metric(theme: &ColorfulTheme, current: Metric) -> Result<Metric> {
    let labels: Vec<&str> = Metric::ALL.iter().map(|m| m.label()).collect();
    let default = Metric::ALL.iter().position(|&m| m == current).unwrap_or(0);

    let choice = Select::with_theme(theme)
        .with_prompt("Select Metric to Display")
        .items(&labels)
        .default(default)
        .interact()
        .into_diagnostic()?;

    Ok(Metric::ALL[choice])
}
