//! Pickup sports tournament app: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_schedule, compute_standings, current_round, delete_manual_match, finalize_event,
    generate_fixtures, record_manual_match, refinalize_event, submit_round, Round, RoundState,
    ScheduleConfig,
};
pub use models::{
    AwardLedger, Event, EventId, EventMode, EventStatus, Match, MatchId, MatchStatus,
    ParticipantId, ScoreEntry, StandingRow, Team, TeamMembership, TournamentError, MANUAL_ROUND,
};
