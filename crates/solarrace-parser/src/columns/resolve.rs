use std::collections::{BTreeMap, HashMap};

use csv::StringRecord;

use crate::errors::ParserError;

use super::{aliases_for, LogicalField, OPTIONAL_FIELDS, REQUIRED_FIELDS};

const BOM: char = '\u{feff}';

/// Trim whitespace, drop any byte-order marks, lowercase.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches(BOM).trim().to_lowercase()
}

struct HeaderEntry {
    normalized: String,
    original: String,
    index: usize,
}

/// Positions of the logical fields within one CSV header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: HashMap<LogicalField, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    pub fn resolve(header: &StringRecord) -> Result<Self, ParserError> {
        // first-seen original header wins for each normalized name
        let mut entries: Vec<HeaderEntry> = Vec::with_capacity(header.len());
        for (index, raw) in header.iter().enumerate() {
            let normalized = normalize_header(raw);
            if entries.iter().any(|entry| entry.normalized == normalized) {
                continue;
            }
            entries.push(HeaderEntry {
                normalized,
                original: raw.to_string(),
                index,
            });
        }

        let pick = |field: LogicalField| {
            let aliases = aliases_for(field);
            entries
                .iter()
                .find(|entry| aliases.contains(&entry.normalized.as_str()))
                .map(|entry| entry.index)
        };

        let mut positions = HashMap::new();
        let mut missing = Vec::new();
        for field in REQUIRED_FIELDS {
            match pick(field) {
                Some(index) => {
                    positions.insert(field, index);
                }
                None => missing.push(field),
            }
        }

        if !missing.is_empty() {
            let sorted: BTreeMap<&str, &str> = entries
                .iter()
                .map(|entry| (entry.normalized.as_str(), entry.original.as_str()))
                .collect();
            return Err(ParserError::MissingColumns {
                missing,
                normalized: sorted.keys().map(|key| key.to_string()).collect(),
                original: sorted.values().map(|value| value.to_string()).collect(),
            });
        }

        for field in OPTIONAL_FIELDS {
            if let Some(index) = pick(field) {
                positions.insert(field, index);
            }
        }

        Ok(Self {
            positions,
            headers: header.iter().map(str::to_string).collect(),
        })
    }

    pub fn position(&self, field: LogicalField) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn has(&self, field: LogicalField) -> bool {
        self.positions.contains_key(&field)
    }

    /// Original header text the field was resolved from.
    pub fn header_for(&self, field: LogicalField) -> Option<&str> {
        self.position(field)
            .and_then(|index| self.headers.get(index))
            .map(String::as_str)
    }

    /// Raw cell for `field`; `None` when the column is absent or the row is short.
    pub fn cell<'r>(&self, record: &'r StringRecord, field: LogicalField) -> Option<&'r str> {
        self.position(field).and_then(|index| record.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn normalizes_bom_whitespace_and_case() {
        assert_eq!(normalize_header("\u{feff}  Latitude "), "latitude");
        assert_eq!(normalize_header(" \u{feff}TIME"), "time");
        assert_eq!(normalize_header("MessengerID"), "messengerid");
    }

    #[test]
    fn resolves_aliases_case_insensitively() {
        let map = ColumnMap::resolve(&header(&[
            "\u{feff}Time",
            "LATITUDE",
            " Longitude ",
            "MessengerId",
            "ShortName",
        ]))
        .expect("resolve");

        assert_eq!(map.position(LogicalField::Time), Some(0));
        assert_eq!(map.position(LogicalField::Latitude), Some(1));
        assert_eq!(map.position(LogicalField::Longitude), Some(2));
        assert_eq!(map.position(LogicalField::MessengerId), Some(3));
        assert_eq!(map.position(LogicalField::ShortName), Some(4));
        assert!(!map.has(LogicalField::Speed));
        assert_eq!(map.header_for(LogicalField::Longitude), Some(" Longitude "));
    }

    #[test]
    fn first_seen_header_wins_on_collision() {
        let map = ColumnMap::resolve(&header(&[
            "time",
            "Latitude",
            "latitude ",
            "lon",
            "messengerid",
        ]))
        .expect("resolve");

        assert_eq!(map.position(LogicalField::Latitude), Some(1));
        assert_eq!(map.header_for(LogicalField::Latitude), Some("Latitude"));
    }

    #[test]
    fn leftmost_matching_alias_wins() {
        let map = ColumnMap::resolve(&header(&["lat", "time", "latitude", "lng", "messenger"]))
            .expect("resolve");

        assert_eq!(map.position(LogicalField::Latitude), Some(0));
        assert_eq!(map.position(LogicalField::Longitude), Some(3));
    }

    #[test]
    fn missing_required_column_lists_headers() {
        let err = ColumnMap::resolve(&header(&["Time", "Latitude", "messengerid", "Speed"]))
            .expect_err("longitude is missing");

        match err {
            ParserError::MissingColumns {
                missing,
                normalized,
                original,
            } => {
                assert_eq!(missing, vec![LogicalField::Longitude]);
                assert_eq!(normalized, vec!["latitude", "messengerid", "speed", "time"]);
                assert_eq!(original, vec!["Latitude", "messengerid", "Speed", "Time"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cell_is_none_for_short_rows_and_absent_columns() {
        let map = ColumnMap::resolve(&header(&["time", "lat", "lon", "messengerid", "speed"]))
            .expect("resolve");
        let row = StringRecord::from(vec!["2025-08-24T10:29:08Z", "1", "2", "M1"]);

        assert_eq!(map.cell(&row, LogicalField::MessengerId), Some("M1"));
        assert_eq!(map.cell(&row, LogicalField::Speed), None);
        assert_eq!(map.cell(&row, LogicalField::Altitude), None);
    }
}
