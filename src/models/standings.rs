//! Per-team standings row (derived view, never stored).

use serde::{Deserialize, Serialize};

/// Aggregate record for one team over an event's completed matches.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl StandingRow {
    /// Zero row for a team that has not completed a match yet.
    pub fn zero(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }
}
