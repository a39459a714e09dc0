//! Fixture generation: circle-method round robin fitted into time slots.

use crate::models::{Event, EventMode, EventStatus, Match, Team, TournamentError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Timing and capacity constraints for one event's schedule.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ScheduleConfig {
    pub event_duration_minutes: u32,
    pub warmup_minutes: u32,
    pub match_length_minutes: u32,
    /// How many matches can run at the same time.
    pub concurrent_fields: usize,
}

/// One generated time slot: round number, offset from event start, pairings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based slot index; becomes `round_number` on persisted matches.
    pub number: u32,
    /// Minutes after event start (warmup included). Absolute time is the
    /// caller's concern, see [`Round::kickoff`].
    pub offset_minutes: u32,
    /// `(home, away)` team names, in rotation order.
    pub pairings: Vec<(String, String)>,
}

impl Round {
    /// Resolve this round's offset against an absolute event start.
    pub fn kickoff(&self, event_start: DateTime<Utc>) -> DateTime<Utc> {
        event_start + Duration::minutes(self.offset_minutes as i64)
    }
}

/// Generate a round-robin fixture list for the given teams and constraints.
///
/// Circle method: team indices occupy a ring of slots (a bye slot is added
/// when the count is odd); each rotation pairs slot `i` with slot `m-1-i`,
/// then slots `1..m` rotate by one while slot 0 stays fixed. Every pair of
/// real teams meets exactly once across the rotations.
///
/// Time fitting: at most `(duration - warmup) / match_length` slots are
/// produced, and each slot keeps only the first `concurrent_fields` pairings
/// of its rotation. Excess pairings are dropped, not deferred, so scarce
/// fields under-schedule the round robin.
pub fn generate_fixtures(
    teams: &[Team],
    config: &ScheduleConfig,
) -> Result<Vec<Round>, TournamentError> {
    if teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams {
            required: 2,
            got: teams.len(),
        });
    }
    if config.match_length_minutes == 0 {
        return Err(TournamentError::InvalidMatchLength);
    }
    if config.concurrent_fields == 0 {
        return Err(TournamentError::InvalidFieldCount);
    }

    let usable = config
        .event_duration_minutes
        .saturating_sub(config.warmup_minutes);
    let max_rounds = (usable / config.match_length_minutes) as usize;

    // Slots hold team indices; `None` is the bye. The bye takes the fixed
    // slot so each rotation simply drops its one bye pairing.
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(teams.len() + 1);
    if teams.len() % 2 != 0 {
        slots.push(None);
    }
    slots.extend((0..teams.len()).map(Some));

    let m = slots.len();
    let rotations = m - 1;

    let mut rounds = Vec::new();
    for slot_index in 0..rotations.min(max_rounds) {
        let mut pairings: Vec<(String, String)> = Vec::with_capacity(m / 2);
        for i in 0..m / 2 {
            if let (Some(home), Some(away)) = (slots[i], slots[m - 1 - i]) {
                pairings.push((teams[home].name.clone(), teams[away].name.clone()));
            }
        }
        pairings.truncate(config.concurrent_fields);

        rounds.push(Round {
            number: slot_index as u32 + 1,
            offset_minutes: config.warmup_minutes
                + slot_index as u32 * config.match_length_minutes,
            pairings,
        });

        slots[1..].rotate_right(1);
    }

    Ok(rounds)
}

/// Persist a generated schedule onto the event: one `Scheduled` match per
/// pairing, scores zeroed, round numbers taken from the plan.
///
/// Fixtures can be applied once; changing teams or re-scheduling after that
/// means starting a new tournament, so a second apply is rejected.
pub fn apply_schedule(event: &mut Event, rounds: &[Round]) -> Result<(), TournamentError> {
    if event.mode != EventMode::RoundRobin {
        return Err(TournamentError::InvalidState);
    }
    if event.status == EventStatus::Completed {
        return Err(TournamentError::AlreadyFinalized);
    }
    if event.matches.iter().any(|m| m.is_tournament_match()) {
        return Err(TournamentError::InvalidState);
    }

    // Validate every pairing, then build every match, before touching the
    // event: a bad plan must not leave a partial schedule behind.
    let mut created = Vec::new();
    for round in rounds {
        for (home, away) in &round.pairings {
            if !event.has_team(home) {
                return Err(TournamentError::UnknownTeam(home.clone()));
            }
            if !event.has_team(away) {
                return Err(TournamentError::UnknownTeam(away.clone()));
            }
            created.push(Match::new(event.id, home, away, round.number)?);
        }
    }
    event.matches.extend(created);
    Ok(())
}
