use std::collections::BTreeMap;
use std::path::PathBuf;

use solarrace_parser::columns::{OPTIONAL_FIELDS, REQUIRED_FIELDS};
use solarrace_parser::parse_telemetry_file;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::CoreError;
use crate::grouping::{build_timelines, TeamTimelines};
use crate::outputs::{dir_collisions, TimelineWriter};

/// Parsed and grouped telemetry, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub timelines: TeamTimelines,
    pub parsed_rows: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub parsed_rows: usize,
    pub skipped_rows: usize,
    pub teams: usize,
    pub total_points: usize,
    pub index_path: PathBuf,
}

pub fn plan(config: &RunConfig) -> Result<PlannedRun, CoreError> {
    let parsed = parse_telemetry_file(&config.input)?;
    for field in REQUIRED_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
        match parsed.columns.header_for(*field) {
            Some(header) => debug!(field = %field, header, "column"),
            None => debug!(field = %field, "column absent"),
        }
    }
    for skipped in &parsed.skipped {
        debug!(line = skipped.line_index, reason = %skipped.reason, "skipped row");
    }
    info!(
        input = %config.input.display(),
        rows = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "parse"
    );

    let parsed_rows = parsed.records.len();
    let skipped_rows = parsed.skipped.len();
    let timelines = build_timelines(parsed.records)?;
    info!(teams = timelines.len(), "group");

    for stat in timelines.dedupe_stats() {
        if stat.collapsed() > 0 {
            info!(
                team = %stat.team,
                before = stat.before,
                after = stat.after,
                "dedupe"
            );
        }
    }

    Ok(PlannedRun {
        timelines,
        parsed_rows,
        skipped_rows,
    })
}

/// Parse, group and write every team timeline plus the index.
///
/// Nothing is written when the input cannot be parsed.
pub fn run(config: &RunConfig) -> Result<RunSummary, CoreError> {
    let planned = plan(config)?;
    let writer = TimelineWriter::new(&config.out_root)?;

    for (dir, teams) in dir_collisions(&planned.timelines) {
        warn!(dir = %dir, teams = ?teams, "team keys share an output directory");
    }

    let mut dirs = BTreeMap::new();
    let mut total_points = 0;
    for (team, timeline) in planned.timelines.iter() {
        let written = writer.write_team(team, timeline)?;
        info!(
            team = %team,
            rows = written.rows,
            path = %written.path.display(),
            "write"
        );
        total_points += written.rows;
        dirs.insert(team.to_string(), written.dir);
    }

    let index_path = writer.write_index(&planned.timelines, &dirs)?;
    info!(
        path = %index_path.display(),
        teams = planned.timelines.len(),
        rows = total_points,
        "index"
    );

    Ok(RunSummary {
        parsed_rows: planned.parsed_rows,
        skipped_rows: planned.skipped_rows,
        teams: planned.timelines.len(),
        total_points,
        index_path,
    })
}
