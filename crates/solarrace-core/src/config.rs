use std::env;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "telemetry/alldata-latest.csv";
pub const DEFAULT_OUT_ROOT: &str = "public";

pub const INPUT_ENV: &str = "SOLARRACE_INPUT";
pub const OUT_ROOT_ENV: &str = "SOLARRACE_OUT_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub out_root: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            out_root: PathBuf::from(DEFAULT_OUT_ROOT),
        }
    }
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, out_root: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_root: out_root.into(),
        }
    }

    /// Defaults overlaid with `SOLARRACE_INPUT` / `SOLARRACE_OUT_ROOT` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(input) = lookup(INPUT_ENV).filter(|value| !value.trim().is_empty()) {
            config.input = PathBuf::from(input);
        }
        if let Some(out_root) = lookup(OUT_ROOT_ENV).filter(|value| !value.trim().is_empty()) {
            config.out_root = PathBuf::from(out_root);
        }
        config
    }

    pub fn with_input(mut self, input: Option<PathBuf>) -> Self {
        if let Some(input) = input {
            self.input = input;
        }
        self
    }

    pub fn with_out_root(mut self, out_root: Option<PathBuf>) -> Self {
        if let Some(out_root) = out_root {
            self.out_root = out_root;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_export_layout() {
        let config = RunConfig::default();
        assert_eq!(config.input, PathBuf::from("telemetry/alldata-latest.csv"));
        assert_eq!(config.out_root, PathBuf::from("public"));
    }

    #[test]
    fn env_values_override_defaults() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(INPUT_ENV, "data/race.csv"), (OUT_ROOT_ENV, "  ")]);
        let config = RunConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.input, PathBuf::from("data/race.csv"));
        assert_eq!(config.out_root, PathBuf::from(DEFAULT_OUT_ROOT));
    }

    #[test]
    fn explicit_paths_win() {
        let config = RunConfig::default()
            .with_input(Some(PathBuf::from("a.csv")))
            .with_out_root(None);
        assert_eq!(config.input, PathBuf::from("a.csv"));
        assert_eq!(config.out_root, PathBuf::from(DEFAULT_OUT_ROOT));
    }
}
