use super::observation::Observation;
use super::round::{RoundError, RoundState};
use crate::model::action::Action;
use crate::model::hand::{Hand, HandValue};
use crate::model::seat::Seat;
use rand::Rng;

/// A fully determined round seen from one acting seat.
///
/// Worlds are produced by [`Observation::sample_world`] and never mutated:
/// [`SampledWorld::step`] returns a successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledWorld {
    state: RoundState,
    seat: Seat,
}

impl SampledWorld {
    pub fn new(state: RoundState, seat: Seat) -> Self {
        Self { state, seat }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn hand(&self) -> &Hand {
        self.state.hand(self.seat)
    }

    pub fn value(&self) -> HandValue {
        self.state.value(self.seat)
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.state.legal_actions(self.seat)
    }

    /// Advances the acting seat by `action`.
    ///
    /// The reward is zero while the seat keeps acting and equals the seat's
    /// hand score on the transition that ends its turn.
    pub fn step<R: Rng + ?Sized>(
        &self,
        action: Action,
        rng: &mut R,
    ) -> Result<(SampledWorld, f64), RoundError> {
        let state = self.state.sample(self.seat, action, rng)?;
        let reward = if state.has_stood(self.seat) {
            f64::from(state.score(self.seat))
        } else {
            0.0
        };
        Ok((
            SampledWorld {
                state,
                seat: self.seat,
            },
            reward,
        ))
    }

    pub fn observe(&self) -> Observation {
        Observation::new(&self.state, self.seat)
    }
}

#[cfg(test)]
mod tests {
    use super::SampledWorld;
    use crate::game::round::RoundState;
    use crate::model::action::Action;
    use crate::model::card::Card;
    use crate::model::seat::Seat;
    use crate::model::shoe::Shoe;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world(player: Vec<Card>) -> SampledWorld {
        let state = RoundState::from_hands(
            Shoe::new(1),
            vec![player, vec![Card::Ten, Card::Seven]],
            false,
        )
        .unwrap();
        SampledWorld::new(state, Seat::new(0))
    }

    #[test]
    fn hit_without_bust_pays_nothing_yet() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = world(vec![Card::Two, Card::Three]);
        let (next, reward) = start.step(Action::Hit, &mut rng).unwrap();
        assert_eq!(reward, 0.0);
        assert!(!next.legal_actions().is_empty());
        assert_eq!(start.hand().len(), 2);
    }

    #[test]
    fn stand_pays_hand_score() {
        let mut rng = StdRng::seed_from_u64(2);
        let (next, reward) = world(vec![Card::Ace, Card::King])
            .step(Action::Stand, &mut rng)
            .unwrap();
        assert_eq!(reward, 22.0);
        assert!(next.legal_actions().is_empty());
    }

    #[test]
    fn stepping_a_finished_seat_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let (done, _) = world(vec![Card::Ten, Card::Nine])
            .step(Action::Stand, &mut rng)
            .unwrap();
        assert!(done.step(Action::Hit, &mut rng).is_err());
    }
}
