use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'c' => Ok(Suit::Clubs),
            'd' => Ok(Suit::Diamonds),
            'h' => Ok(Suit::Hearts),
            's' => Ok(Suit::Spades),
            _ => Err(Error::InvalidSuit(c.to_string())),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Face value, 2 for a deuce through 14 for an ace.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Position in `23456789TJQKA`, 0 for a deuce through 12 for an ace.
    pub fn index(self) -> usize {
        self as usize - 2
    }

    pub fn letter(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(Error::InvalidRank(c.to_string())),
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::from_char(c),
            _ => Err(Error::InvalidRank(s.to_string())),
        }
    }
}

impl FromStr for Suit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Suit::from_char(c),
            _ => Err(Error::InvalidSuit(s.to_string())),
        }
    }
}

/// A playing card. Ordered by rank first, suit second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Builds a card from its rank and suit characters, case-insensitively.
    pub fn from_chars(rank: char, suit: char) -> Result<Self> {
        Ok(Self::new(Rank::from_char(rank)?, Suit::from_char(suit)?))
    }

    pub fn rank_value(&self) -> u8 {
        self.rank.value()
    }

    pub fn rank_index(&self) -> usize {
        self.rank.index()
    }

    /// Bit position in a 52-bit card set.
    pub fn bit(&self) -> u64 {
        1u64 << (self.suit.index() * 13 + self.rank.index())
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.letter(), self.suit.symbol())
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.letter(), self.suit.letter())
    }
}

impl FromStr for Card {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.trim().chars().collect();
        match chars.as_slice() {
            [rank, suit] => Card::from_chars(*rank, *suit),
            _ => Err(Error::MalformedCards(s.to_string())),
        }
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Two distinct hole cards, stored highest first.
///
/// Equality and hashing do not depend on the order the cards were supplied
/// in, since construction always sorts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Hand {
    high: Card,
    low: Card,
}

impl Hand {
    pub fn new(first: Card, second: Card) -> Result<Self> {
        if first == second {
            return Err(Error::DuplicateCard(first));
        }
        let (high, low) = if first > second {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { high, low })
    }

    pub fn cards(&self) -> [Card; 2] {
        [self.high, self.low]
    }

    pub fn high(&self) -> Card {
        self.high
    }

    pub fn low(&self) -> Card {
        self.low
    }

    pub fn mask(&self) -> u64 {
        self.high.bit() | self.low.bit()
    }

    pub fn is_pair(&self) -> bool {
        self.high.rank == self.low.rank
    }

    pub fn is_suited(&self) -> bool {
        self.high.suit == self.low.suit
    }

    pub fn contains(&self, card: Card) -> bool {
        self.high == card || self.low == card
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.high.pretty(), self.low.pretty())
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.high, self.low)
    }
}

impl FromStr for Hand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.trim().chars().collect();
        match chars.as_slice() {
            [r1, s1, r2, s2] => Hand::new(Card::from_chars(*r1, *s1)?, Card::from_chars(*r2, *s2)?),
            _ => Err(Error::MalformedCards(s.to_string())),
        }
    }
}

impl Serialize for Hand {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a board string such as `"AsKd7c"` into its cards.
///
/// Whitespace is ignored. Duplicates are rejected.
pub fn parse_cards(input: &str) -> Result<Vec<Card>> {
    let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.len() % 2 != 0 {
        return Err(Error::MalformedCards(input.to_string()));
    }
    let mut cards: Vec<Card> = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let card = Card::from_chars(pair[0], pair[1])?;
        if cards.contains(&card) {
            return Err(Error::DuplicateCard(card));
        }
        cards.push(card);
    }
    Ok(cards)
}

pub fn standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

/// The cards of a fresh deck minus every card whose bit is set in `seen`.
pub fn remaining_deck(seen: u64) -> Vec<Card> {
    standard_deck()
        .into_iter()
        .filter(|card| seen & card.bit() == 0)
        .collect()
}

pub fn mask_of(cards: &[Card]) -> u64 {
    cards.iter().fold(0, |mask, card| mask | card.bit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_parsing_is_case_insensitive() {
        let card: Card = "kH".parse().unwrap();
        assert_eq!(card, Card::new(Rank::King, Suit::Hearts));
        assert_eq!(card.to_string(), "Kh");
    }

    #[test]
    fn rank_index_spans_deuce_to_ace() {
        assert_eq!(Card::new(Rank::Two, Suit::Spades).rank_index(), 0);
        assert_eq!(Card::new(Rank::King, Suit::Spades).rank_index(), 11);
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).rank_index(), 12);
    }

    #[test]
    fn card_bits_are_unique() {
        let mask = mask_of(&standard_deck());
        assert_eq!(mask.count_ones(), 52);
    }

    #[test]
    fn hand_orders_high_card_first() {
        let hand = Hand::new(
            Card::new(Rank::Two, Suit::Spades),
            Card::new(Rank::Ace, Suit::Hearts),
        )
        .unwrap();
        assert_eq!(hand.high(), Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(hand.to_string(), "Ah2s");
    }

    #[test]
    fn remaining_deck_skips_seen_cards() {
        let hand: Hand = "AsKd".parse().unwrap();
        let deck = remaining_deck(hand.mask());
        assert_eq!(deck.len(), 50);
        assert!(!deck.iter().any(|card| hand.contains(*card)));
    }
}
