use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one calculation. Field names on the wire follow the
/// camelCase layout the saved-results file has always used.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub episodes: u64,
    pub duration_per_episode: u64,
    pub total_minutes: u64,
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Only set once the result has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl CalculationResult {
    /// One-line summary used by the text output of several commands.
    pub fn summary(&self) -> String {
        format!(
            "{} days, {} hours and {} minutes",
            self.days, self.hours, self.minutes
        )
    }
}
