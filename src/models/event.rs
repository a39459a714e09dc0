//! Event aggregate and TournamentError.

use crate::models::game::{Match, MatchId};
use crate::models::roster::ParticipantId;
use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough teams to generate fixtures (need at least 2).
    NotEnoughTeams { required: usize, got: usize },
    /// Match length must be a positive number of minutes.
    InvalidMatchLength,
    /// Concurrent field count must be at least 1.
    InvalidFieldCount,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// A match cannot pair a team against itself.
    SameTeam,
    /// Team name not configured on this event.
    UnknownTeam(String),
    /// Match id does not belong to this event (or to the targeted round).
    UnknownMatch(MatchId),
    /// Scores must be non-negative integers.
    InvalidScore,
    /// Scores were submitted for a round other than the current one.
    RoundNotCurrent { submitted: u32, current: u32 },
    /// The event is already finalized; edits go through re-finalize.
    AlreadyFinalized,
    /// Event is not in a state (or mode) that allows this action.
    InvalidState,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughTeams { required, got } => {
                write!(f, "Need at least {} teams (have {})", required, got)
            }
            TournamentError::InvalidMatchLength => write!(f, "Match length must be positive"),
            TournamentError::InvalidFieldCount => write!(f, "Need at least 1 field"),
            TournamentError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            TournamentError::SameTeam => write!(f, "A team cannot play itself"),
            TournamentError::UnknownTeam(name) => write!(f, "Unknown team: {}", name),
            TournamentError::UnknownMatch(_) => write!(f, "Match not found"),
            TournamentError::InvalidScore => write!(f, "Scores must be non-negative integers"),
            TournamentError::RoundNotCurrent { submitted, current } => {
                write!(f, "Round {} is not the current round ({})", submitted, current)
            }
            TournamentError::AlreadyFinalized => {
                write!(f, "Event is finalized; use re-finalize to edit results")
            }
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

/// Unique identifier for an event.
pub type EventId = Uuid;

/// How matches come into existence for an event. The mode is chosen at
/// creation and never inferred from the match data.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMode {
    /// Operator records completed matches one by one; no round progression.
    Manual,
    /// Fixture generator creates rounds; scores enter round by round.
    #[default]
    RoundRobin,
}

/// Lifecycle status of the event itself. `Completed` is terminal for round
/// submission; only the re-finalize path may edit results after that.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

/// One pickup event: configured teams, its matches, and finalization state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub teams: Vec<Team>,
    pub mode: EventMode,
    pub status: EventStatus,
    pub matches: Vec<Match>,
    /// MVP recorded at finalization; the "previous MVP" when re-finalizing.
    pub mvp_player_id: Option<ParticipantId>,
}

impl Event {
    /// Create a new event. Team names must be unique (case-insensitive).
    pub fn new(
        name: impl Into<String>,
        teams: Vec<Team>,
        mode: EventMode,
    ) -> Result<Self, TournamentError> {
        let mut event = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            teams: Vec::new(),
            mode,
            status: EventStatus::Scheduled,
            matches: Vec::new(),
            mvp_player_id: None,
        };
        for team in teams {
            event.add_team(team)?;
        }
        Ok(event)
    }

    pub fn has_team(&self, name: &str) -> bool {
        self.teams.iter().any(|t| t.name == name)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Add a team. Rejected once any match exists: the schedule is built on
    /// the configured team list, so changing it means starting a new
    /// tournament.
    pub fn add_team(&mut self, team: Team) -> Result<(), TournamentError> {
        if !self.matches.is_empty() || self.status == EventStatus::Completed {
            return Err(TournamentError::InvalidState);
        }
        let name = team.name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidState);
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName);
        }
        self.teams.push(Team::new(name, team.color));
        Ok(())
    }

    /// Remove a team by name (only before any match exists).
    pub fn remove_team(&mut self, name: &str) -> Result<(), TournamentError> {
        if !self.matches.is_empty() || self.status == EventStatus::Completed {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .teams
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| TournamentError::UnknownTeam(name.to_string()))?;
        self.teams.remove(idx);
        Ok(())
    }
}
