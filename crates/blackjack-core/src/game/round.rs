use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::hand::{Hand, HandValue};
use crate::model::seat::Seat;
use crate::model::shoe::{Shoe, ShoeError};
use rand::Rng;
use serde::{Deserialize, Serialize};

static NO_HAND: Hand = Hand::new();

/// Complete, fully observed state of one round at a table.
///
/// The dealer always occupies the last seat. Transitions either mutate in place
/// (`apply`, used by the table) or produce a fresh value (`sample`, used by
/// planners), so earlier states stay valid for anyone holding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    shoe: Shoe,
    hands: Vec<Hand>,
    stood: Vec<bool>,
    allow_double: bool,
}

impl RoundState {
    /// Deals two cards to each player, then two to the dealer.
    pub fn deal<R: Rng + ?Sized>(
        mut shoe: Shoe,
        n_players: usize,
        allow_double: bool,
        rng: &mut R,
    ) -> Result<Self, RoundError> {
        let seats = n_players + 1;
        let mut hands = Vec::with_capacity(seats);
        for _ in 0..seats {
            let mut hand = Hand::new();
            hand.add(shoe.draw(rng)?);
            hand.add(shoe.draw(rng)?);
            hands.push(hand);
        }
        Ok(Self::assemble(shoe, hands, allow_double))
    }

    /// Builds a round from explicit hands, taking those cards out of `shoe`.
    /// The last hand belongs to the dealer.
    pub fn from_hands(
        mut shoe: Shoe,
        hands: Vec<Vec<Card>>,
        allow_double: bool,
    ) -> Result<Self, RoundError> {
        if hands.is_empty() {
            return Err(RoundError::NoDealer);
        }
        for card in hands.iter().flatten() {
            shoe.remove(*card)?;
        }
        let hands = hands.into_iter().map(Hand::with_cards).collect();
        Ok(Self::assemble(shoe, hands, allow_double))
    }

    fn assemble(shoe: Shoe, hands: Vec<Hand>, allow_double: bool) -> Self {
        let mut state = Self {
            shoe,
            stood: vec![false; hands.len()],
            hands,
            allow_double,
        };
        for index in 0..state.hands.len() {
            state.stood[index] = state.hands[index].is_bust();
        }
        state
    }

    pub fn seat_count(&self) -> usize {
        self.hands.len()
    }

    pub fn dealer(&self) -> Seat {
        Seat::from_index(self.hands.len().saturating_sub(1)).unwrap_or(Seat::new(0))
    }

    /// Non-dealer seats in turn order.
    pub fn players(&self) -> impl Iterator<Item = Seat> + '_ {
        (0..self.hands.len().saturating_sub(1)).filter_map(Seat::from_index)
    }

    /// Every seat in turn order, dealer last.
    pub fn turn_order(&self) -> impl Iterator<Item = Seat> + '_ {
        (0..self.hands.len()).filter_map(Seat::from_index)
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn allow_double(&self) -> bool {
        self.allow_double
    }

    /// The seat's hand; a seat not at this table reads as an empty hand.
    pub fn hand(&self, seat: Seat) -> &Hand {
        self.hands.get(seat.index()).unwrap_or(&NO_HAND)
    }

    pub fn value(&self, seat: Seat) -> HandValue {
        self.hand(seat).value()
    }

    pub fn score(&self, seat: Seat) -> u8 {
        self.hand(seat).score()
    }

    pub fn is_bust(&self, seat: Seat) -> bool {
        self.hand(seat).is_bust()
    }

    pub fn has_stood(&self, seat: Seat) -> bool {
        self.stood.get(seat.index()).copied().unwrap_or(true)
    }

    pub fn legal_actions(&self, seat: Seat) -> Vec<Action> {
        if self.has_stood(seat) {
            return Vec::new();
        }
        Action::ALL
            .iter()
            .copied()
            .filter(|action| self.allow_double || *action != Action::Double)
            .collect()
    }

    /// Commits `action` for `seat`.
    ///
    /// An exhausted shoe is refilled from every card not currently held at the
    /// table, so a long round never stalls on an empty shoe.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        seat: Seat,
        action: Action,
        rng: &mut R,
    ) -> Result<(), RoundError> {
        if seat.index() >= self.hands.len() {
            return Err(RoundError::UnknownSeat(seat));
        }
        if self.stood[seat.index()] {
            return Err(RoundError::AlreadyStood(seat));
        }
        if action == Action::Double && !self.allow_double {
            return Err(RoundError::DoubleNotAllowed);
        }

        if action.draws() {
            let card = match self.shoe.draw(rng) {
                Ok(card) => card,
                Err(ShoeError::Empty) => {
                    self.shoe
                        .reshuffle_excluding(self.hands.iter().flat_map(|hand| hand.iter()));
                    self.shoe.draw(rng)?
                }
                Err(err) => return Err(err.into()),
            };
            let hand = &mut self.hands[seat.index()];
            hand.add(card);
            self.stood[seat.index()] = hand.is_bust();
        }

        if action.ends_turn() {
            self.stood[seat.index()] = true;
        }
        Ok(())
    }

    /// Returns the successor state, leaving `self` untouched.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        seat: Seat,
        action: Action,
        rng: &mut R,
    ) -> Result<Self, RoundError> {
        let mut next = self.clone();
        next.apply(seat, action, rng)?;
        Ok(next)
    }

    /// Result of `seat` against the dealer: higher score wins, a bust always
    /// loses, equal live scores push.
    pub fn outcome(&self, seat: Seat) -> RoundOutcome {
        let mine = self.score(seat);
        let dealer = self.score(self.dealer());
        if mine == 0 || mine < dealer {
            RoundOutcome::Loss
        } else if mine > dealer {
            RoundOutcome::Win
        } else {
            RoundOutcome::Push
        }
    }

    pub fn into_shoe(self) -> Shoe {
        self.shoe
    }

    /// Takes the dealer's face-down card back into the shoe.
    pub(crate) fn conceal_hole_card(&mut self) -> Option<Card> {
        let dealer = self.dealer().index();
        let card = self.hands[dealer].take_first()?;
        if self.shoe.replace(card).is_err() {
            self.hands[dealer].put_first(card);
            return None;
        }
        Some(card)
    }

    /// Draws a face-down card for the dealer from the shoe.
    pub(crate) fn reveal_hole_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        let card = self.shoe.draw(rng).ok()?;
        let dealer = self.dealer().index();
        self.hands[dealer].put_first(card);
        Some(card)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Loss,
    Push,
}

impl RoundOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundOutcome::Win => "win",
            RoundOutcome::Loss => "loss",
            RoundOutcome::Push => "push",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    NoDealer,
    UnknownSeat(Seat),
    AlreadyStood(Seat),
    DoubleNotAllowed,
    Shoe(ShoeError),
}

impl From<ShoeError> for RoundError {
    fn from(err: ShoeError) -> Self {
        RoundError::Shoe(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundError, RoundOutcome, RoundState};
    use crate::model::action::Action;
    use crate::model::card::Card;
    use crate::model::seat::Seat;
    use crate::model::shoe::Shoe;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_round(player: Vec<Card>, dealer: Vec<Card>) -> RoundState {
        RoundState::from_hands(Shoe::new(1), vec![player, dealer], false).unwrap()
    }

    #[test]
    fn deal_gives_two_cards_to_every_seat() {
        let mut rng = StdRng::seed_from_u64(1);
        let round = RoundState::deal(Shoe::new(2), 3, false, &mut rng).unwrap();
        assert_eq!(round.seat_count(), 4);
        assert_eq!(round.dealer(), Seat::new(3));
        for seat in round.turn_order() {
            assert_eq!(round.hand(seat).len(), 2);
        }
        assert_eq!(round.shoe().len(), 104 - 8);
    }

    #[test]
    fn from_hands_removes_cards_from_shoe() {
        let round = fixed_round(vec![Card::Ten, Card::Nine], vec![Card::Ten, Card::Seven]);
        assert_eq!(round.shoe().count(Card::Ten), 2);
        assert_eq!(round.shoe().count(Card::Nine), 3);
        assert_eq!(round.shoe().len(), 48);
    }

    #[test]
    fn legal_actions_respect_double_rule() {
        let round = fixed_round(vec![Card::Five, Card::Six], vec![Card::Ten, Card::Seven]);
        assert_eq!(round.legal_actions(Seat::new(0)), vec![Action::Stand, Action::Hit]);

        let doubled =
            RoundState::from_hands(Shoe::new(1), vec![vec![Card::Five], vec![Card::Two]], true)
                .unwrap();
        assert_eq!(
            doubled.legal_actions(Seat::new(0)),
            vec![Action::Stand, Action::Hit, Action::Double]
        );
    }

    #[test]
    fn stand_ends_turn_and_rejects_further_actions() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut round = fixed_round(vec![Card::Ten, Card::Nine], vec![Card::Ten, Card::Seven]);
        round.apply(Seat::new(0), Action::Stand, &mut rng).unwrap();
        assert!(round.has_stood(Seat::new(0)));
        assert!(round.legal_actions(Seat::new(0)).is_empty());
        assert_eq!(
            round.apply(Seat::new(0), Action::Hit, &mut rng),
            Err(RoundError::AlreadyStood(Seat::new(0)))
        );
    }

    #[test]
    fn hit_adds_a_card_and_busting_ends_turn() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shoe = Shoe::new(1);
        for card in Card::ALL.iter().copied().filter(|c| c.points() != 10) {
            for _ in 0..4 {
                shoe.remove(card).unwrap();
            }
        }
        let mut round = RoundState::from_hands(
            shoe,
            vec![vec![Card::Ten, Card::Jack], vec![Card::Queen, Card::King]],
            false,
        )
        .unwrap();
        round.apply(Seat::new(0), Action::Hit, &mut rng).unwrap();
        assert_eq!(round.hand(Seat::new(0)).len(), 3);
        assert!(round.is_bust(Seat::new(0)));
        assert!(round.has_stood(Seat::new(0)));
    }

    #[test]
    fn sample_leaves_original_untouched() {
        let mut rng = StdRng::seed_from_u64(4);
        let round = fixed_round(vec![Card::Two, Card::Three], vec![Card::Ten, Card::Seven]);
        let next = round.sample(Seat::new(0), Action::Hit, &mut rng).unwrap();
        assert_eq!(round.hand(Seat::new(0)).len(), 2);
        assert_eq!(next.hand(Seat::new(0)).len(), 3);
    }

    #[test]
    fn double_rejected_when_rules_forbid_it() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = fixed_round(vec![Card::Five, Card::Six], vec![Card::Ten, Card::Seven]);
        assert_eq!(
            round.apply(Seat::new(0), Action::Double, &mut rng),
            Err(RoundError::DoubleNotAllowed)
        );
    }

    #[test]
    fn outcome_compares_against_dealer() {
        let win = fixed_round(vec![Card::Ten, Card::Nine], vec![Card::Ten, Card::Seven]);
        assert_eq!(win.outcome(Seat::new(0)), RoundOutcome::Win);

        let push = fixed_round(vec![Card::Ten, Card::Seven], vec![Card::Nine, Card::Eight]);
        assert_eq!(push.outcome(Seat::new(0)), RoundOutcome::Push);

        let loss = fixed_round(vec![Card::Ten, Card::Six], vec![Card::Ten, Card::Seven]);
        assert_eq!(loss.outcome(Seat::new(0)), RoundOutcome::Loss);
    }

    #[test]
    fn bust_loses_even_against_busted_dealer() {
        let round = fixed_round(
            vec![Card::Ten, Card::Nine, Card::Five],
            vec![Card::Ten, Card::Six, Card::Eight],
        );
        assert_eq!(round.outcome(Seat::new(0)), RoundOutcome::Loss);
    }

    #[test]
    fn empty_shoe_refills_without_cards_on_the_table() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut round = fixed_round(vec![Card::Two, Card::Three], vec![Card::King, Card::Five]);
        for card in Card::ALL {
            while round.shoe.count(card) > 0 {
                round.shoe.remove(card).unwrap();
            }
        }
        round.apply(Seat::new(0), Action::Hit, &mut rng).unwrap();
        let drawn = round.hand(Seat::new(0)).cards()[2];
        let held = [Card::Two, Card::Three, Card::King, Card::Five, drawn];
        for card in Card::ALL {
            let on_table = held.iter().filter(|c| **c == card).count() as u16;
            assert_eq!(round.shoe().count(card), 4 - on_table);
        }
    }

    #[test]
    fn unknown_seat_reads_as_empty_hand() {
        let round = fixed_round(vec![Card::Ten, Card::Nine], vec![Card::Ten, Card::Seven]);
        let stranger = Seat::new(5);
        assert!(round.hand(stranger).is_empty());
        assert_eq!(round.score(stranger), 0);
        assert!(round.legal_actions(stranger).is_empty());
    }
}
