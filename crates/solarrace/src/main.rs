use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use solarrace_core::outputs::safe_dir_name;
use solarrace_core::{pipeline, RunConfig};
use solarrace_parser::format_timestamp;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build per-team race timelines from a telemetry CSV export", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse, group and write team timelines plus the index (default)
    Build(BuildArgs),
    /// List the teams found in the export without writing anything
    Teams(TeamsArgs),
}

#[derive(Args, Debug, Default)]
struct BuildArgs {
    /// Telemetry CSV export (default: telemetry/alldata-latest.csv)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output root; timelines land in <out-root>/teams (default: public)
    #[arg(long)]
    out_root: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct TeamsArgs {
    /// Telemetry CSV export (default: telemetry/alldata-latest.csv)
    #[arg(long)]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command.unwrap_or(Command::Build(BuildArgs::default())) {
        Command::Build(args) => handle_build(args),
        Command::Teams(args) => handle_teams(args),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn handle_build(args: BuildArgs) -> Result<()> {
    let config = RunConfig::from_env()
        .with_input(args.input)
        .with_out_root(args.out_root);

    let summary = pipeline::run(&config)
        .with_context(|| format!("failed to build timelines from {}", config.input.display()))?;

    info!(
        teams = summary.teams,
        points = summary.total_points,
        skipped = summary.skipped_rows,
        "done"
    );
    println!(
        "Wrote {} teams ({} points) to {}",
        summary.teams,
        summary.total_points,
        summary.index_path.display()
    );
    Ok(())
}

fn handle_teams(args: TeamsArgs) -> Result<()> {
    let config = RunConfig::from_env().with_input(args.input);
    let planned = pipeline::plan(&config)
        .with_context(|| format!("failed to read teams from {}", config.input.display()))?;

    let mut table = Table::new();
    table.set_header(vec!["Team", "Dir", "Short", "Name", "Points", "Last seen"]);
    for (team, timeline) in planned.timelines.iter() {
        let (short, name, last_seen) = match timeline.last() {
            Some(last) => (
                last.short_name().to_string(),
                last.team_name().to_string(),
                format_timestamp(last.timestamp()),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        table.add_row(vec![
            team.to_string(),
            safe_dir_name(team),
            short,
            name,
            timeline.len().to_string(),
            last_seen,
        ]);
    }

    println!("{table}");
    println!(
        "{} teams, {} points, {} rows skipped",
        planned.timelines.len(),
        planned.timelines.total_points(),
        planned.skipped_rows
    );
    Ok(())
}
