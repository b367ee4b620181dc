use super::LogicalField;

pub const REQUIRED_FIELDS: [LogicalField; 4] = [
    LogicalField::Time,
    LogicalField::Latitude,
    LogicalField::Longitude,
    LogicalField::MessengerId,
];

pub const OPTIONAL_FIELDS: [LogicalField; 8] = [
    LogicalField::Speed,
    LogicalField::Altitude,
    LogicalField::Team,
    LogicalField::ShortName,
    LogicalField::CarName,
    LogicalField::TeamNumber,
    LogicalField::Distance,
    LogicalField::RaceClass,
];

/// Normalized header spellings accepted for each field.
pub fn aliases_for(field: LogicalField) -> &'static [&'static str] {
    use LogicalField::*;
    match field {
        Time => &["time", "timestamp"],
        Latitude => &["latitude", "lat"],
        Longitude => &["longitude", "lon", "lng"],
        MessengerId => &["messengerid", "messenger_id", "messenger"],
        Speed => &["speed"],
        Altitude => &["altitude", "alt"],
        Team => &["team", "teamname", "team_name"],
        ShortName => &["shortname", "short_name"],
        CarName => &["car", "carname", "car_name"],
        TeamNumber => &["teamnum", "teamnumber", "team_number"],
        Distance => &["distance"],
        RaceClass => &["class", "raceclass", "race_class"],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn aliases_are_unique_across_fields() {
        let mut seen = HashSet::new();
        for field in REQUIRED_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
            for alias in aliases_for(*field) {
                assert!(seen.insert(*alias), "alias '{alias}' used twice");
            }
        }
    }

    #[test]
    fn aliases_are_already_normalized() {
        for field in REQUIRED_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
            for alias in aliases_for(*field) {
                assert_eq!(*alias, alias.trim().to_lowercase());
            }
        }
    }
}
