//! Round progression: derived tournament state and score submission.

use crate::models::{
    Event, EventMode, EventStatus, Match, MatchId, MatchStatus, ScoreEntry, TournamentError,
    MANUAL_ROUND,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Derived progression state of an event's tournament matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// No tournament matches exist yet.
    NotStarted,
    /// Lowest round with at least one unsettled match.
    InRound(u32),
    /// Every tournament match is settled.
    Complete,
}

/// Compute the current round from the event's matches.
///
/// Cancelled matches count as settled: they are excluded from completeness
/// and never block progression, so a round whose matches were all cancelled
/// is skipped over without input.
pub fn current_round(event: &Event) -> RoundState {
    let mut round_numbers: Vec<u32> = event
        .matches
        .iter()
        .filter(|m| m.is_tournament_match())
        .map(|m| m.round_number)
        .collect();
    if round_numbers.is_empty() {
        return RoundState::NotStarted;
    }
    round_numbers.sort_unstable();
    round_numbers.dedup();

    for round in round_numbers {
        let unsettled = event
            .matches
            .iter()
            .any(|m| m.round_number == round && !m.status.is_settled());
        if unsettled {
            return RoundState::InRound(round);
        }
    }
    RoundState::Complete
}

/// Submit scores for the current round and advance.
///
/// Matches already completed (or cancelled) are left untouched even when a
/// score was supplied, so a partially-saved round can be re-entered. Pending
/// matches missing from `scores` close as 0-0 draws rather than blocking the
/// round. All validation happens before any match is written.
pub fn submit_round(
    event: &mut Event,
    round: u32,
    scores: &HashMap<MatchId, ScoreEntry>,
) -> Result<RoundState, TournamentError> {
    if event.mode != EventMode::RoundRobin {
        return Err(TournamentError::InvalidState);
    }
    if event.status == EventStatus::Completed {
        return Err(TournamentError::AlreadyFinalized);
    }
    match current_round(event) {
        RoundState::InRound(current) if current == round => {}
        RoundState::InRound(current) => {
            return Err(TournamentError::RoundNotCurrent {
                submitted: round,
                current,
            });
        }
        RoundState::NotStarted | RoundState::Complete => {
            return Err(TournamentError::InvalidState);
        }
    }
    for id in scores.keys() {
        let known = event
            .matches
            .iter()
            .any(|m| m.id == *id && m.round_number == round);
        if !known {
            return Err(TournamentError::UnknownMatch(*id));
        }
    }

    for m in event
        .matches
        .iter_mut()
        .filter(|m| m.round_number == round && !m.status.is_settled())
    {
        let entry = scores.get(&m.id).copied().unwrap_or_default();
        m.home_score = entry.home;
        m.away_score = entry.away;
        m.status = MatchStatus::Completed;
        m.is_final = true;
    }
    if event.status == EventStatus::Scheduled {
        event.status = EventStatus::Active;
    }

    Ok(current_round(event))
}

/// Record a completed match outside tournament control (manual mode).
pub fn record_manual_match(
    event: &mut Event,
    home_team: &str,
    away_team: &str,
    score: ScoreEntry,
) -> Result<MatchId, TournamentError> {
    if event.mode != EventMode::Manual {
        return Err(TournamentError::InvalidState);
    }
    if event.status == EventStatus::Completed {
        return Err(TournamentError::AlreadyFinalized);
    }
    if !event.has_team(home_team) {
        return Err(TournamentError::UnknownTeam(home_team.to_string()));
    }
    if !event.has_team(away_team) {
        return Err(TournamentError::UnknownTeam(away_team.to_string()));
    }

    let mut m = Match::new(event.id, home_team, away_team, MANUAL_ROUND)?;
    m.home_score = score.home;
    m.away_score = score.away;
    m.status = MatchStatus::Completed;
    let id = m.id;
    event.matches.push(m);
    Ok(id)
}

/// Delete a manually recorded match. Fixture matches are deleted only by
/// deleting the owning event.
pub fn delete_manual_match(event: &mut Event, id: MatchId) -> Result<(), TournamentError> {
    if event.mode != EventMode::Manual {
        return Err(TournamentError::InvalidState);
    }
    if event.status == EventStatus::Completed {
        return Err(TournamentError::AlreadyFinalized);
    }
    let idx = event
        .matches
        .iter()
        .position(|m| m.id == id)
        .ok_or(TournamentError::UnknownMatch(id))?;
    event.matches.remove(idx);
    Ok(())
}
