use core::fmt;
use serde::{Deserialize, Serialize};

/// A card face. Suits never matter at the table, so a card is only its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Card {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Card {
    pub const ALL: [Card; 13] = [
        Card::Ace,
        Card::Two,
        Card::Three,
        Card::Four,
        Card::Five,
        Card::Six,
        Card::Seven,
        Card::Eight,
        Card::Nine,
        Card::Ten,
        Card::Jack,
        Card::Queen,
        Card::King,
    ];

    pub const fn from_face(face: u8) -> Option<Self> {
        match face {
            1 => Some(Card::Ace),
            2 => Some(Card::Two),
            3 => Some(Card::Three),
            4 => Some(Card::Four),
            5 => Some(Card::Five),
            6 => Some(Card::Six),
            7 => Some(Card::Seven),
            8 => Some(Card::Eight),
            9 => Some(Card::Nine),
            10 => Some(Card::Ten),
            11 => Some(Card::Jack),
            12 => Some(Card::Queen),
            13 => Some(Card::King),
            _ => None,
        }
    }

    pub const fn face(self) -> u8 {
        self as u8
    }

    /// Index into per-face tables (`0..13`).
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Hard point value; aces count one here and are promoted by the hand.
    pub const fn points(self) -> u8 {
        let face = self as u8;
        if face > 10 { 10 } else { face }
    }

    pub const fn is_ace(self) -> bool {
        matches!(self, Card::Ace)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Card::Ace => "A",
            Card::Two => "2",
            Card::Three => "3",
            Card::Four => "4",
            Card::Five => "5",
            Card::Six => "6",
            Card::Seven => "7",
            Card::Eight => "8",
            Card::Nine => "9",
            Card::Ten => "10",
            Card::Jack => "J",
            Card::Queen => "Q",
            Card::King => "K",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Card;

    #[test]
    fn from_face_maps() {
        assert_eq!(Card::from_face(12), Some(Card::Queen));
        assert_eq!(Card::from_face(0), None);
        assert_eq!(Card::from_face(14), None);
    }

    #[test]
    fn court_cards_count_ten() {
        assert_eq!(Card::Jack.points(), 10);
        assert_eq!(Card::King.points(), 10);
        assert_eq!(Card::Ace.points(), 1);
        assert_eq!(Card::Seven.points(), 7);
    }

    #[test]
    fn index_covers_all_faces() {
        for (i, card) in Card::ALL.iter().enumerate() {
            assert_eq!(card.index(), i);
        }
    }

    #[test]
    fn display_matches_symbols() {
        assert_eq!(Card::Ace.to_string(), "A");
        assert_eq!(Card::Ten.to_string(), "10");
    }
}
