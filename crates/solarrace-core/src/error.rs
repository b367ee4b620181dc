use std::path::PathBuf;

use solarrace_parser::ParserError;
use thiserror::Error;

use crate::grouping::GroupingError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Grouping(#[from] GroupingError),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
