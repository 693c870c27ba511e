use core::fmt;
use serde::{Deserialize, Serialize};

/// Moves available to a seat while it is still acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Take no further cards this round.
    Stand,
    /// Draw one card.
    Hit,
    /// Draw exactly one card, then stand.
    Double,
}

impl Action {
    /// Enumeration order; also the tie-break order used by planners.
    pub const ALL: [Action; 3] = [Action::Stand, Action::Hit, Action::Double];

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Stand => "stand",
            Action::Hit => "hit",
            Action::Double => "double",
        }
    }

    pub const fn draws(self) -> bool {
        matches!(self, Action::Hit | Action::Double)
    }

    pub const fn ends_turn(self) -> bool {
        matches!(self, Action::Stand | Action::Double)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
