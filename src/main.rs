//! shop-plan - CLI tool to inspect workshop projects and print their cut list.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use workshop_planner::{
    generate_cut_list, material_usage, render_report, validate_project, CutListSummary,
    Measurement, PlannerConfig, ProjectData, ProjectStats, Unit,
};

/// Print the cut list and material cost of a workshop project.
#[derive(Parser, Debug)]
#[command(name = "shop-plan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input project file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Display unit (mm, cm, in, m); defaults to the project's unit
    #[arg(short, long)]
    unit: Option<Unit>,

    /// Planner configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output the cut list as JSON
    #[arg(long)]
    json: bool,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// JSON export of a project's cut list.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    unit: Unit,
    cut_list: CutListSummary,
    stats: ProjectStats,
    measurements: &'a [Measurement],
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            PlannerConfig::from_json(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => PlannerConfig::default(),
    };

    info!("Processing: {}", args.input.display());

    let project = ProjectData::load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    // Validate
    let validation = validate_project(&project);

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    let unit = args.unit.unwrap_or(project.ui_settings.unit);
    let state = project.into_state(config);
    info!(
        "Workspace: {} items, {} guides, {} measurements",
        state.items().len(),
        state.guides().len(),
        state.measurements().len()
    );

    let summary = generate_cut_list(state.items());

    let output = if args.json {
        let report = JsonReport {
            unit,
            stats: material_usage(state.items()),
            cut_list: summary,
            measurements: state.measurements(),
        };
        serde_json::to_string_pretty(&report)?
    } else {
        render_report(&summary, state.measurements(), unit)
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generated: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
