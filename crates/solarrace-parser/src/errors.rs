use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::columns::LogicalField;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error(
        "CSV missing required columns [{}]; have (normalized): {normalized:?}; have (raw): {original:?}",
        join_fields(.missing)
    )]
    MissingColumns {
        missing: Vec<LogicalField>,
        normalized: Vec<String>,
        original: Vec<String>,
    },

    #[error("failed to read telemetry input{}: {source}", describe_path(.path.as_deref()))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
}

impl ParserError {
    pub fn is_missing_columns(&self) -> bool {
        matches!(self, ParserError::MissingColumns { .. })
    }
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|path| format!(" {}", path.display()))
        .unwrap_or_default()
}

fn join_fields(fields: &[LogicalField]) -> String {
    fields
        .iter()
        .map(LogicalField::canonical_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a single data row was skipped. Never escapes the parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("column '{column}' missing from row")]
    MissingValue { column: LogicalField },

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("failed to parse column '{column}' as float: '{value}'")]
    InvalidNumber { column: LogicalField, value: String },

    #[error("column '{column}' is not finite: '{value}'")]
    NonFinite { column: LogicalField, value: String },

    #[error("unreadable CSV record: {message}")]
    Malformed { message: String },
}
