//! Blackjack table model: cards, shoe, hands, rounds and the per-seat views
//! that planners consume.

pub mod game;
pub mod model;

pub use game::observation::Observation;
pub use game::round::{RoundError, RoundOutcome, RoundState};
pub use game::table::Table;
pub use game::world::SampledWorld;
pub use model::action::Action;
pub use model::card::Card;
pub use model::hand::{Hand, HandValue};
pub use model::rules::{RulesError, TableRules};
pub use model::seat::Seat;
pub use model::shoe::{Shoe, ShoeError};

/// Highest score a single hand can produce (a natural blackjack).
pub const MAX_ROUND_SCORE: u8 = 22;
