//! Team configuration for one event.

use serde::{Deserialize, Serialize};

/// A team as configured on an event: display name plus a UI color.
///
/// The name is the join key to matches and roster assignments, so it must be
/// unique within one event (case-insensitive). Teams are configured once per
/// event and are immutable for scheduling purposes once any match exists.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Display color (CSS value); cosmetic only.
    #[serde(default)]
    pub color: String,
}

impl Team {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}
