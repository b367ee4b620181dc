use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use solarrace_parser::TelemetryRecord;
use thiserror::Error;

pub const UNKNOWN_TEAM: &str = "UNKNOWN";

#[derive(Debug, Error, PartialEq)]
pub enum GroupingError {
    #[error("timeline has more than one record at {timestamp}")]
    DuplicateTimestamp { timestamp: DateTime<Utc> },
    #[error("timeline is out of order: {next} follows {previous}")]
    OutOfOrder {
        previous: DateTime<Utc>,
        next: DateTime<Utc>,
    },
}

/// Identity a record is grouped under: the first non-empty of short name, team number,
/// messenger id and team name, else `UNKNOWN`.
pub fn team_key(record: &TelemetryRecord) -> &str {
    [
        record.short_name(),
        record.team_number(),
        record.messenger_id(),
        record.team_name(),
    ]
    .into_iter()
    .find(|candidate| !candidate.is_empty())
    .unwrap_or(UNKNOWN_TEAM)
}

/// Bucket records by team key, each bucket sorted by timestamp.
///
/// The sort is stable, so records sharing a timestamp stay in arrival order.
pub fn group_by_team<I>(records: I) -> BTreeMap<String, Vec<TelemetryRecord>>
where
    I: IntoIterator<Item = TelemetryRecord>,
{
    let mut grouped: BTreeMap<String, Vec<TelemetryRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(team_key(&record).to_string())
            .or_default()
            .push(record);
    }
    for records in grouped.values_mut() {
        records.sort_by_key(TelemetryRecord::timestamp);
    }
    grouped
}

/// Collapse records sharing a timestamp, keeping the last one in input order.
pub fn dedupe_by_timestamp(mut records: Vec<TelemetryRecord>) -> Result<TeamTimeline, GroupingError> {
    records.sort_by_key(TelemetryRecord::timestamp);

    let mut kept: Vec<TelemetryRecord> = Vec::with_capacity(records.len());
    for record in records {
        match kept.last_mut() {
            Some(last) if last.timestamp() == record.timestamp() => *last = record,
            _ => kept.push(record),
        }
    }

    TeamTimeline::from_sorted(kept)
}

/// One team's records, strictly increasing by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTimeline {
    records: Vec<TelemetryRecord>,
}

impl TeamTimeline {
    pub fn from_sorted(records: Vec<TelemetryRecord>) -> Result<Self, GroupingError> {
        for pair in records.windows(2) {
            let (previous, next) = (pair[0].timestamp(), pair[1].timestamp());
            if previous == next {
                return Err(GroupingError::DuplicateTimestamp { timestamp: next });
            }
            if previous > next {
                return Err(GroupingError::OutOfOrder { previous, next });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TelemetryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TelemetryRecord> {
        self.records.last()
    }
}

impl<'a> IntoIterator for &'a TeamTimeline {
    type Item = &'a TelemetryRecord;
    type IntoIter = std::slice::Iter<'a, TelemetryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeStat {
    pub team: String,
    pub before: usize,
    pub after: usize,
}

impl DedupeStat {
    pub fn collapsed(&self) -> usize {
        self.before - self.after
    }
}

/// Every team's timeline, iterated in team-key order.
#[derive(Debug, Clone, Default)]
pub struct TeamTimelines {
    teams: BTreeMap<String, TeamTimeline>,
    stats: Vec<DedupeStat>,
}

impl TeamTimelines {
    pub fn get(&self, team: &str) -> Option<&TeamTimeline> {
        self.teams.get(team)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeamTimeline)> {
        self.teams
            .iter()
            .map(|(team, timeline)| (team.as_str(), timeline))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.teams.values().map(TeamTimeline::len).sum()
    }

    /// Per-team counts before and after timestamp collapse, in team-key order.
    pub fn dedupe_stats(&self) -> &[DedupeStat] {
        &self.stats
    }
}

pub fn build_timelines<I>(records: I) -> Result<TeamTimelines, GroupingError>
where
    I: IntoIterator<Item = TelemetryRecord>,
{
    let mut timelines = TeamTimelines::default();
    for (team, records) in group_by_team(records) {
        let before = records.len();
        let timeline = dedupe_by_timestamp(records)?;
        timelines.stats.push(DedupeStat {
            team: team.clone(),
            before,
            after: timeline.len(),
        });
        timelines.teams.insert(team, timeline);
    }
    Ok(timelines)
}
