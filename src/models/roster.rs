//! External collaborator records: team memberships (booking) and the MVP
//! award ledger (profile). The core only flips `is_winner` flags and moves
//! award counts; both records are owned by the surrounding application.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a participant (booking/profile subsystems share it).
pub type ParticipantId = Uuid;

/// A participant's team assignment for one event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub participant_id: ParticipantId,
    pub team: String,
    /// Set by the finalizer for members of the winning team.
    pub is_winner: bool,
}

impl TeamMembership {
    pub fn new(participant_id: ParticipantId, team: impl Into<String>) -> Self {
        Self {
            participant_id,
            team: team.into(),
            is_winner: false,
        }
    }
}

/// Cumulative MVP award counts per participant.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AwardLedger(HashMap<ParticipantId, u32>);

impl AwardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, id: ParticipantId) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    /// Award one MVP to a participant.
    pub fn grant(&mut self, id: ParticipantId) {
        *self.0.entry(id).or_insert(0) += 1;
    }

    /// Take one MVP back (floors at 0: a count never goes negative).
    pub fn revoke(&mut self, id: ParticipantId) {
        if let Some(n) = self.0.get_mut(&id) {
            *n = n.saturating_sub(1);
        }
    }
}
