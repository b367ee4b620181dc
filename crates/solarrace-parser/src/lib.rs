pub mod columns;
pub mod errors;
mod fields;
pub mod model;
mod reader;

pub use errors::{ParserError, RowError};
pub use model::{format_timestamp, SkippedRow, TelemetryRecord, TimelinePoint};
pub use reader::{
    parse_telemetry_file, parse_telemetry_reader, parse_telemetry_str, ParsedTelemetry,
};
