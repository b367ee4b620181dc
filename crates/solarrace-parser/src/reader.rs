use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::columns::{ColumnMap, LogicalField};
use crate::errors::{ParserError, RowError};
use crate::fields::{
    parse_coordinate, parse_optional_f64, parse_timestamp, required, text, text_with_fallback,
};
use crate::model::{SkippedRow, TelemetryRecord};

#[derive(Debug, Clone)]
pub struct ParsedTelemetry {
    pub records: Vec<TelemetryRecord>,
    pub skipped: Vec<SkippedRow>,
    pub columns: ColumnMap,
}

impl ParsedTelemetry {
    pub fn row_count(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

pub fn parse_telemetry_file(path: impl AsRef<Path>) -> Result<ParsedTelemetry, ParserError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParserError::Io {
        path: Some(path.to_path_buf()),
        source,
    })?;
    parse_csv(BufReader::new(file), Some(path))
}

pub fn parse_telemetry_str(content: &str) -> Result<ParsedTelemetry, ParserError> {
    parse_telemetry_reader(content.as_bytes())
}

pub fn parse_telemetry_reader<R: Read>(input: R) -> Result<ParsedTelemetry, ParserError> {
    parse_csv(input, None)
}

fn parse_csv<R: Read>(input: R, path: Option<&Path>) -> Result<ParsedTelemetry, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let header = reader
        .headers()
        .map_err(|source| ParserError::Csv { source })?
        .clone();
    let columns = ColumnMap::resolve(&header)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let line_index = row_idx + 2; // header is line 1

        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(read_failure(path, err)),
            Err(err) => {
                skipped.push(SkippedRow {
                    line_index,
                    reason: RowError::Malformed {
                        message: err.to_string(),
                    },
                });
                continue;
            }
        };

        let line_index = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(line_index);

        match parse_row(&columns, &record) {
            Ok(parsed) => records.push(parsed),
            Err(reason) => skipped.push(SkippedRow { line_index, reason }),
        }
    }

    Ok(ParsedTelemetry {
        records,
        skipped,
        columns,
    })
}

fn read_failure(path: Option<&Path>, err: csv::Error) -> ParserError {
    let source = match err.into_kind() {
        csv::ErrorKind::Io(source) => source,
        other => std::io::Error::other(format!("{other:?}")),
    };
    ParserError::Io {
        path: path.map(PathBuf::from),
        source,
    }
}

/// Coerce one data row. Any failure rejects the whole row.
pub(crate) fn parse_row(
    columns: &ColumnMap,
    record: &StringRecord,
) -> Result<TelemetryRecord, RowError> {
    let cell = |field: LogicalField| columns.cell(record, field);

    let timestamp = parse_timestamp(required(LogicalField::Time, cell(LogicalField::Time))?)?;
    let latitude = parse_coordinate(
        LogicalField::Latitude,
        required(LogicalField::Latitude, cell(LogicalField::Latitude))?,
    )?;
    let longitude = parse_coordinate(
        LogicalField::Longitude,
        required(LogicalField::Longitude, cell(LogicalField::Longitude))?,
    )?;
    let messenger_id = required(LogicalField::MessengerId, cell(LogicalField::MessengerId))?;

    let speed = parse_optional_f64(LogicalField::Speed, cell(LogicalField::Speed))?;
    let altitude = parse_optional_f64(LogicalField::Altitude, cell(LogicalField::Altitude))?;
    let distance = parse_optional_f64(LogicalField::Distance, cell(LogicalField::Distance))?;

    Ok(TelemetryRecord::new(timestamp, latitude, longitude, messenger_id)
        .with_speed(speed)
        .with_altitude(altitude)
        .with_distance(distance)
        .with_team_name(text_with_fallback(
            cell(LogicalField::Team),
            cell(LogicalField::ShortName),
        ))
        .with_team_number(text(cell(LogicalField::TeamNumber)))
        .with_short_name(text(cell(LogicalField::ShortName)))
        .with_car_name(text(cell(LogicalField::CarName)))
        .with_race_class(text(cell(LogicalField::RaceClass))))
}
