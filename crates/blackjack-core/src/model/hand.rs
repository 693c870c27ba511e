use crate::model::card::Card;

const TWENTY_ONE: u8 = 21;
const BLACKJACK_SCORE: u8 = 22;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes and returns the first (face-down) card.
    pub fn take_first(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn put_first(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn value(&self) -> HandValue {
        HandValue::of(&self.cards)
    }

    pub fn score(&self) -> u8 {
        self.value().score()
    }

    pub fn is_bust(&self) -> bool {
        self.value().is_bust()
    }
}

/// Evaluated hand: best total with aces promoted to eleven where possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandValue {
    total: u8,
    soft: bool,
    blackjack: bool,
}

impl HandValue {
    pub fn of(cards: &[Card]) -> Self {
        let mut total: u32 = 0;
        let mut aces = 0u32;
        for card in cards {
            if card.is_ace() {
                total += 11;
                aces += 1;
            } else {
                total += u32::from(card.points());
            }
        }
        while total > u32::from(TWENTY_ONE) && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        let total = total.min(u32::from(u8::MAX)) as u8;
        Self {
            total,
            soft: aces > 0 && total <= TWENTY_ONE,
            blackjack: total == TWENTY_ONE && cards.len() == 2,
        }
    }

    /// Raw best total, which may exceed 21.
    pub const fn total(self) -> u8 {
        self.total
    }

    pub const fn is_soft(self) -> bool {
        self.soft
    }

    pub const fn is_blackjack(self) -> bool {
        self.blackjack
    }

    pub const fn is_bust(self) -> bool {
        self.total > TWENTY_ONE
    }

    /// Table score: 22 for a natural, 0 for a bust, otherwise the total.
    pub const fn score(self) -> u8 {
        if self.blackjack {
            BLACKJACK_SCORE
        } else if self.is_bust() {
            0
        } else {
            self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Hand, HandValue};
    use crate::model::card::Card;

    #[test]
    fn hard_total_sums_points() {
        let value = HandValue::of(&[Card::King, Card::Seven]);
        assert_eq!(value.total(), 17);
        assert!(!value.is_soft());
        assert_eq!(value.score(), 17);
    }

    #[test]
    fn ace_counts_eleven_when_safe() {
        let value = HandValue::of(&[Card::Ace, Card::Six]);
        assert_eq!(value.total(), 17);
        assert!(value.is_soft());
    }

    #[test]
    fn ace_demotes_to_one_on_overflow() {
        let value = HandValue::of(&[Card::Ace, Card::Six, Card::Nine]);
        assert_eq!(value.total(), 16);
        assert!(!value.is_soft());
    }

    #[test]
    fn two_card_twenty_one_is_blackjack() {
        let value = HandValue::of(&[Card::Ace, Card::Queen]);
        assert!(value.is_blackjack());
        assert_eq!(value.score(), 22);

        let three_card = HandValue::of(&[Card::Seven, Card::Seven, Card::Seven]);
        assert!(!three_card.is_blackjack());
        assert_eq!(three_card.score(), 21);
    }

    #[test]
    fn bust_scores_zero() {
        let hand = Hand::with_cards(vec![Card::King, Card::Queen, Card::Two]);
        assert!(hand.is_bust());
        assert_eq!(hand.score(), 0);
    }

    #[test]
    fn first_card_can_be_hidden_and_restored() {
        let mut hand = Hand::with_cards(vec![Card::Nine, Card::Five]);
        let hidden = hand.take_first();
        assert_eq!(hidden, Some(Card::Nine));
        assert_eq!(hand.cards(), &[Card::Five]);
        hand.put_first(Card::Nine);
        assert_eq!(hand.cards(), &[Card::Nine, Card::Five]);
    }
}
