use super::round::{RoundError, RoundState};
use super::world::SampledWorld;
use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::hand::{Hand, HandValue};
use crate::model::seat::Seat;
use rand::Rng;

/// What one seat can see of a round.
///
/// For every seat except the dealer the dealer's face-down card is masked: it
/// is removed from the dealer's hand and counted back into the shoe, so the
/// shoe reflects every card the seat cannot rule out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    view: RoundState,
    seat: Seat,
    masked: bool,
}

impl Observation {
    pub fn new(state: &RoundState, seat: Seat) -> Self {
        let mut view = state.clone();
        let masked = seat != view.dealer() && view.conceal_hole_card().is_some();
        Self { view, seat, masked }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn hand(&self) -> &Hand {
        self.view.hand(self.seat)
    }

    pub fn value(&self) -> HandValue {
        self.view.value(self.seat)
    }

    /// Dealer cards visible to this seat.
    pub fn dealer_cards(&self) -> &[Card] {
        self.view.hand(self.view.dealer()).cards()
    }

    /// True when some card of the true state is hidden from this seat.
    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// The partially hidden view itself.
    pub fn view(&self) -> &RoundState {
        &self.view
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        self.view.legal_actions(self.seat)
    }

    pub fn is_terminal(&self) -> bool {
        self.legal_actions().is_empty()
    }

    /// Completes the hidden information with a draw from the unseen cards.
    pub fn sample_world<R: Rng + ?Sized>(&self, rng: &mut R) -> SampledWorld {
        let mut state = self.view.clone();
        if self.masked {
            state.reveal_hole_card(rng);
        }
        SampledWorld::new(state, self.seat)
    }

    /// Samples the next observation after `action`, with its reward.
    pub fn sample_next<R: Rng + ?Sized>(
        &self,
        action: Action,
        rng: &mut R,
    ) -> Result<(Observation, f64), RoundError> {
        let (next, reward) = self.sample_world(rng).step(action, rng)?;
        Ok((next.observe(), reward))
    }
}

#[cfg(test)]
mod tests {
    use super::Observation;
    use crate::game::round::RoundState;
    use crate::model::action::Action;
    use crate::model::card::Card;
    use crate::model::seat::Seat;
    use crate::model::shoe::Shoe;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn round() -> RoundState {
        RoundState::from_hands(
            Shoe::new(1),
            vec![vec![Card::Ten, Card::Six], vec![Card::King, Card::Five]],
            false,
        )
        .unwrap()
    }

    #[test]
    fn player_view_masks_hole_card() {
        let state = round();
        let obs = Observation::new(&state, Seat::new(0));
        assert!(obs.is_masked());
        assert_eq!(obs.dealer_cards(), &[Card::Five]);
        assert_eq!(obs.view().shoe().len(), state.shoe().len() + 1);
        assert_eq!(obs.view().shoe().count(Card::King), 4);
    }

    #[test]
    fn dealer_sees_everything() {
        let state = round();
        let obs = Observation::new(&state, state.dealer());
        assert!(!obs.is_masked());
        assert_eq!(obs.dealer_cards(), &[Card::King, Card::Five]);
    }

    #[test]
    fn sampled_world_restores_a_hole_card() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = round();
        let obs = Observation::new(&state, Seat::new(0));
        for _ in 0..20 {
            let world = obs.sample_world(&mut rng);
            let dealer = world.state().hand(world.state().dealer());
            assert_eq!(dealer.len(), 2);
            assert_eq!(dealer.cards()[1], Card::Five);
            assert_eq!(world.state().shoe().len(), state.shoe().len());
            assert_eq!(world.observe(), obs);
        }
    }

    #[test]
    fn sample_next_after_stand_is_terminal_with_score() {
        let mut rng = StdRng::seed_from_u64(10);
        let obs = Observation::new(&round(), Seat::new(0));
        let (next, reward) = obs.sample_next(Action::Stand, &mut rng).unwrap();
        assert!(next.is_terminal());
        assert_eq!(reward, 16.0);
    }

    #[test]
    fn sample_next_after_hit_grows_hand() {
        let mut rng = StdRng::seed_from_u64(11);
        let obs = Observation::new(&round(), Seat::new(0));
        let (next, _) = obs.sample_next(Action::Hit, &mut rng).unwrap();
        assert_eq!(next.hand().len(), 3);
        assert!(next.is_masked());
    }

    #[test]
    fn hole_card_stays_hidden_after_mid_round_refill() {
        let mut rng = StdRng::seed_from_u64(2);
        let on_table = [Card::Two, Card::Three, Card::King, Card::Five];
        let mut shoe = Shoe::new(1);
        // every other card already went to the discards
        for card in Card::ALL {
            let keep = on_table.iter().filter(|c| **c == card).count();
            while usize::from(shoe.count(card)) > keep {
                shoe.remove(card).unwrap();
            }
        }
        let mut state = RoundState::from_hands(
            shoe,
            vec![vec![Card::Two, Card::Three], vec![Card::King, Card::Five]],
            false,
        )
        .unwrap();
        assert!(state.shoe().is_empty());

        state.apply(Seat::new(0), Action::Hit, &mut rng).unwrap();
        assert_eq!(state.hand(Seat::new(0)).len(), 3);

        let obs = Observation::new(&state, Seat::new(0));
        assert!(obs.is_masked());
        assert_eq!(obs.dealer_cards(), &[Card::Five]);
        assert_eq!(obs.view().shoe().len(), state.shoe().len() + 1);
    }
}
