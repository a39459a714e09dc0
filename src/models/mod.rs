//! Data structures for pickup tournaments: teams, matches, events, standings.

mod event;
mod game;
mod roster;
mod standings;
mod team;

pub use event::{Event, EventId, EventMode, EventStatus, TournamentError};
pub use game::{Match, MatchId, MatchStatus, ScoreEntry, MANUAL_ROUND};
pub use roster::{AwardLedger, ParticipantId, TeamMembership};
pub use standings::StandingRow;
pub use team::Team;
