//! Match record and score types.

use crate::models::event::{EventId, TournamentError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Reserved round number for manually recorded, non-tournament matches.
/// Matches with this round number are not subject to round progression.
pub const MANUAL_ROUND: u32 = 0;

/// Lifecycle status of a match. A match's score is meaningful only when
/// `Completed`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Settled matches no longer take part in round progression.
    pub fn is_settled(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }
}

/// A validated pair of non-negative scores.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub home: u32,
    pub away: u32,
}

impl ScoreEntry {
    /// Validate raw (possibly negative) score input from the API boundary.
    pub fn new(home: i64, away: i64) -> Result<Self, TournamentError> {
        if home < 0 || away < 0 || home > u32::MAX as i64 || away > u32::MAX as i64 {
            return Err(TournamentError::InvalidScore);
        }
        Ok(Self {
            home: home as u32,
            away: away as u32,
        })
    }
}

/// A single match between two of an event's teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub event_id: EventId,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    /// 1-based fixture round, or `MANUAL_ROUND` for manually recorded matches.
    pub round_number: u32,
    pub status: MatchStatus,
    /// Set once the match has contributed to finalized stats; makes
    /// finalization re-runs safe.
    pub is_final: bool,
}

impl Match {
    /// Create a scheduled match with zeroed scores. A team never plays itself.
    pub fn new(
        event_id: EventId,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        round_number: u32,
    ) -> Result<Self, TournamentError> {
        let home_team = home_team.into();
        let away_team = away_team.into();
        if home_team.eq_ignore_ascii_case(&away_team) {
            return Err(TournamentError::SameTeam);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            home_team,
            away_team,
            home_score: 0,
            away_score: 0,
            round_number,
            status: MatchStatus::Scheduled,
            is_final: false,
        })
    }

    /// True for matches created by the fixture generator (round progression
    /// applies to these only).
    pub fn is_tournament_match(&self) -> bool {
        self.round_number > MANUAL_ROUND
    }
}
