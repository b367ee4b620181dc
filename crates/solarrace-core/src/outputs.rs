use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solarrace_parser::TimelinePoint;

use crate::error::CoreError;
use crate::grouping::{TeamTimeline, TeamTimelines, UNKNOWN_TEAM};

pub const TEAMS_DIR: &str = "teams";
pub const TIMESERIES_FILE: &str = "timeseries.json";
pub const INDEX_FILE: &str = "index.json";

/// Directory name for a team key: alphanumerics, `-` and `_` only.
pub fn safe_dir_name(team_key: &str) -> String {
    let sanitized: String = team_key
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if sanitized.is_empty() {
        UNKNOWN_TEAM.to_string()
    } else {
        sanitized
    }
}

/// Directory names claimed by more than one team key.
pub fn dir_collisions(timelines: &TeamTimelines) -> BTreeMap<String, Vec<String>> {
    let mut claims: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for team in timelines.keys() {
        claims
            .entry(safe_dir_name(team))
            .or_default()
            .push(team.to_string());
    }
    claims.retain(|_, teams| teams.len() > 1);
    claims
}

/// Index metadata for one team. JSON keys match what the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIndexEntry {
    #[serde(rename = "messengerid")]
    pub messenger_id: String,
    #[serde(rename = "team")]
    pub team_name: String,
    #[serde(rename = "teamnum")]
    pub team_number: String,
    #[serde(rename = "shortname")]
    pub short_name: String,
    #[serde(rename = "carname")]
    pub car_name: String,
    #[serde(rename = "class")]
    pub race_class: String,
    #[serde(rename = "count")]
    pub record_count: usize,
    #[serde(rename = "dir")]
    pub safe_identifier: String,
}

impl TeamIndexEntry {
    /// Labels come from the latest record of the timeline.
    pub fn from_timeline(timeline: &TeamTimeline, safe_identifier: String) -> Self {
        match timeline.last() {
            Some(last) => Self {
                messenger_id: last.messenger_id().to_string(),
                team_name: last.team_name().to_string(),
                team_number: last.team_number().to_string(),
                short_name: last.short_name().to_string(),
                car_name: last.car_name().to_string(),
                race_class: last.race_class().to_string(),
                record_count: timeline.len(),
                safe_identifier,
            },
            None => Self {
                messenger_id: String::new(),
                team_name: String::new(),
                team_number: String::new(),
                short_name: String::new(),
                car_name: String::new(),
                race_class: String::new(),
                record_count: 0,
                safe_identifier,
            },
        }
    }
}

pub fn build_index(
    timelines: &TeamTimelines,
    dirs: &BTreeMap<String, String>,
) -> BTreeMap<String, TeamIndexEntry> {
    timelines
        .iter()
        .map(|(team, timeline)| {
            let dir = dirs
                .get(team)
                .cloned()
                .unwrap_or_else(|| safe_dir_name(team));
            (team.to_string(), TeamIndexEntry::from_timeline(timeline, dir))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTeam {
    pub path: PathBuf,
    pub rows: usize,
    pub dir: String,
}

/// Writes `<out_root>/teams/<dir>/timeseries.json` files and `<out_root>/teams/index.json`.
#[derive(Debug, Clone)]
pub struct TimelineWriter {
    teams_root: PathBuf,
}

impl TimelineWriter {
    pub fn new(out_root: impl AsRef<Path>) -> Result<Self, CoreError> {
        let teams_root = out_root.as_ref().join(TEAMS_DIR);
        fs::create_dir_all(&teams_root).map_err(|err| CoreError::io(&teams_root, err))?;
        Ok(Self { teams_root })
    }

    pub fn write_team(&self, team: &str, timeline: &TeamTimeline) -> Result<WrittenTeam, CoreError> {
        let dir = safe_dir_name(team);
        let folder = self.teams_root.join(&dir);
        fs::create_dir_all(&folder).map_err(|err| CoreError::io(&folder, err))?;

        let rows: Vec<TimelinePoint> = timeline.iter().map(|record| record.to_point()).collect();
        let path = folder.join(TIMESERIES_FILE);
        write_json(&path, &rows)?;

        Ok(WrittenTeam {
            path,
            rows: rows.len(),
            dir,
        })
    }

    pub fn write_index(
        &self,
        timelines: &TeamTimelines,
        dirs: &BTreeMap<String, String>,
    ) -> Result<PathBuf, CoreError> {
        let index = build_index(timelines, dirs);
        let path = self.teams_root.join(INDEX_FILE);
        write_json(&path, &index)?;
        Ok(path)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CoreError> {
    let file = File::create(path).map_err(|err| CoreError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| CoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|err| CoreError::io(path, err))
}
