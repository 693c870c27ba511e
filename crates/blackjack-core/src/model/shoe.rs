use crate::model::card::Card;
use rand::Rng;

const CARDS_PER_FACE_PER_DECK: u16 = 4;

/// Multi-deck card shoe tracked as per-face counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shoe {
    n_decks: u16,
    counts: [u16; 13],
}

impl Shoe {
    pub fn new(n_decks: u16) -> Self {
        Self {
            n_decks,
            counts: [CARDS_PER_FACE_PER_DECK * n_decks; 13],
        }
    }

    pub fn n_decks(&self) -> u16 {
        self.n_decks
    }

    pub fn len(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn count(&self, card: Card) -> u16 {
        self.counts[card.index()]
    }

    /// Full capacity per face for this shoe.
    pub fn capacity_per_face(&self) -> u16 {
        CARDS_PER_FACE_PER_DECK * self.n_decks
    }

    pub fn reshuffle(&mut self) {
        self.counts = [self.capacity_per_face(); 13];
    }

    /// Refills the shoe with every card except those still on the table.
    pub fn reshuffle_excluding<'a>(&mut self, in_play: impl IntoIterator<Item = &'a Card>) {
        self.reshuffle();
        for card in in_play {
            let slot = &mut self.counts[card.index()];
            *slot = slot.saturating_sub(1);
        }
    }

    /// True when fewer than `13 * n_decks * cut` cards remain.
    pub fn needs_reshuffle(&self, cut: f64) -> bool {
        (self.len() as f64) < 13.0 * f64::from(self.n_decks) * cut
    }

    /// Draws one card, weighted by the remaining count of each face.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Card, ShoeError> {
        let total = self.len();
        if total == 0 {
            return Err(ShoeError::Empty);
        }
        let mut pick = rng.gen_range(0..total);
        for card in Card::ALL {
            let count = self.counts[card.index()] as usize;
            if pick < count {
                self.counts[card.index()] -= 1;
                return Ok(card);
            }
            pick -= count;
        }
        unreachable!("weighted pick exceeded shoe size")
    }

    /// Takes a specific card out of the shoe.
    pub fn remove(&mut self, card: Card) -> Result<(), ShoeError> {
        let slot = &mut self.counts[card.index()];
        if *slot == 0 {
            return Err(ShoeError::Exhausted(card));
        }
        *slot -= 1;
        Ok(())
    }

    /// Puts a card back.
    pub fn replace(&mut self, card: Card) -> Result<(), ShoeError> {
        let capacity = self.capacity_per_face();
        let slot = &mut self.counts[card.index()];
        if *slot >= capacity {
            return Err(ShoeError::Overfull(card));
        }
        *slot += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoeError {
    Empty,
    Exhausted(Card),
    Overfull(Card),
}

#[cfg(test)]
mod tests {
    use super::{Shoe, ShoeError};
    use crate::model::card::Card;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn new_shoe_holds_fifty_two_per_deck() {
        assert_eq!(Shoe::new(1).len(), 52);
        assert_eq!(Shoe::new(4).len(), 208);
    }

    #[test]
    fn draw_decrements_the_drawn_face() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shoe = Shoe::new(1);
        let card = shoe.draw(&mut rng).unwrap();
        assert_eq!(shoe.len(), 51);
        assert_eq!(shoe.count(card), 3);
    }

    #[test]
    fn draws_exhaust_the_shoe_exactly() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut shoe = Shoe::new(1);
        let mut drawn = [0u16; 13];
        for _ in 0..52 {
            drawn[shoe.draw(&mut rng).unwrap().index()] += 1;
        }
        assert!(drawn.iter().all(|&n| n == 4));
        assert_eq!(shoe.draw(&mut rng), Err(ShoeError::Empty));
    }

    #[test]
    fn only_remaining_face_is_drawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shoe = Shoe::new(1);
        for card in Card::ALL.iter().copied().filter(|c| *c != Card::Nine) {
            for _ in 0..4 {
                shoe.remove(card).unwrap();
            }
        }
        assert_eq!(shoe.draw(&mut rng), Ok(Card::Nine));
    }

    #[test]
    fn replace_respects_capacity() {
        let mut shoe = Shoe::new(1);
        assert_eq!(shoe.replace(Card::Ace), Err(ShoeError::Overfull(Card::Ace)));
        shoe.remove(Card::Ace).unwrap();
        assert_eq!(shoe.replace(Card::Ace), Ok(()));
    }

    #[test]
    fn remove_fails_when_face_is_gone() {
        let mut shoe = Shoe::new(1);
        for _ in 0..4 {
            shoe.remove(Card::King).unwrap();
        }
        assert_eq!(shoe.remove(Card::King), Err(ShoeError::Exhausted(Card::King)));
    }

    #[test]
    fn reshuffle_threshold_uses_cut() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut shoe = Shoe::new(2);
        assert!(!shoe.needs_reshuffle(0.5));
        while shoe.len() >= 13 {
            shoe.draw(&mut rng).unwrap();
        }
        assert!(shoe.needs_reshuffle(0.5));
        shoe.reshuffle();
        assert_eq!(shoe.len(), 104);
    }

    #[test]
    fn reshuffle_leaves_cards_in_play_out() {
        let mut shoe = Shoe::new(1);
        for card in Card::ALL {
            for _ in 0..4 {
                shoe.remove(card).unwrap();
            }
        }
        assert!(shoe.is_empty());
        let in_play = [Card::King, Card::King, Card::Five];
        shoe.reshuffle_excluding(&in_play);
        assert_eq!(shoe.len(), 49);
        assert_eq!(shoe.count(Card::King), 2);
        assert_eq!(shoe.count(Card::Five), 3);
        assert_eq!(shoe.replace(Card::Five), Ok(()));
    }
}
