mod aliases;
mod resolve;

use std::fmt;

pub use aliases::{aliases_for, OPTIONAL_FIELDS, REQUIRED_FIELDS};
pub use resolve::{normalize_header, ColumnMap};

/// A column the parser knows how to read, independent of the header spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalField {
    Time,
    Latitude,
    Longitude,
    MessengerId,
    Speed,
    Altitude,
    Team,
    ShortName,
    CarName,
    TeamNumber,
    Distance,
    RaceClass,
}

impl LogicalField {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            LogicalField::Time => "time",
            LogicalField::Latitude => "lat",
            LogicalField::Longitude => "lon",
            LogicalField::MessengerId => "messenger_id",
            LogicalField::Speed => "speed",
            LogicalField::Altitude => "altitude",
            LogicalField::Team => "team",
            LogicalField::ShortName => "short",
            LogicalField::CarName => "carname",
            LogicalField::TeamNumber => "teamnum",
            LogicalField::Distance => "distance",
            LogicalField::RaceClass => "class",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
