pub mod config;
pub mod error;
pub mod grouping;
pub mod outputs;
pub mod pipeline;

pub use config::RunConfig;
pub use error::CoreError;
pub use grouping::{build_timelines, team_key, TeamTimeline, TeamTimelines};
pub use pipeline::{plan, run, PlannedRun, RunSummary};
