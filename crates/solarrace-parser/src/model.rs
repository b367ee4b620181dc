use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::RowError;

/// One telemetry sample for one car.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    timestamp: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    speed: Option<f64>,
    altitude: Option<f64>,
    distance: Option<f64>,
    team_name: String,
    team_number: String,
    short_name: String,
    car_name: String,
    race_class: String,
    messenger_id: String,
}

impl TelemetryRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        messenger_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            speed: None,
            altitude: None,
            distance: None,
            team_name: String::new(),
            team_number: String::new(),
            short_name: String::new(),
            car_name: String::new(),
            race_class: String::new(),
            messenger_id: messenger_id.into(),
        }
    }

    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_altitude(mut self, altitude: Option<f64>) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_distance(mut self, distance: Option<f64>) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = team_name.into();
        self
    }

    pub fn with_team_number(mut self, team_number: impl Into<String>) -> Self {
        self.team_number = team_number.into();
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    pub fn with_car_name(mut self, car_name: impl Into<String>) -> Self {
        self.car_name = car_name.into();
        self
    }

    pub fn with_race_class(mut self, race_class: impl Into<String>) -> Self {
        self.race_class = race_class.into();
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn team_number(&self) -> &str {
        &self.team_number
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn car_name(&self) -> &str {
        &self.car_name
    }

    pub fn race_class(&self) -> &str {
        &self.race_class
    }

    pub fn messenger_id(&self) -> &str {
        &self.messenger_id
    }

    /// Row shape written to the per-team timeline.
    pub fn to_point(&self) -> TimelinePoint {
        TimelinePoint {
            ts: format_timestamp(self.timestamp),
            lat: round_to(self.latitude, 6),
            lon: round_to(self.longitude, 6),
            speed: self
                .speed
                .filter(|value| value.is_finite())
                .map(|value| round_to(value, 2)),
            alt: self
                .altitude
                .filter(|value| value.is_finite())
                .map(|value| round_to(value, 1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub ts: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

/// A data row the parser dropped, with the 1-indexed line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line_index: usize,
    pub reason: RowError,
}

/// `2025-08-24T10:29:08Z`, or `2025-08-24T10:29:08.250000Z` when there is a sub-second part.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    if ts.nanosecond() == 0 {
        ts.to_rfc3339_opts(SecondsFormat::Secs, true)
    } else {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// Rounds on the exact binary value, ties to even (`0.125` at 2 places is `0.12`).
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
