//! Range notation expansion.
//!
//! A range string is a comma-separated list of tokens:
//! - `"QQ"` - one pair (6 combos)
//! - `"JJ+"` - that pair and every higher pair
//! - `"AKs"` / `"AKo"` - suited (4 combos) or offsuit (12 combos)
//! - `"ATs+"` - fixed high rank, kicker climbing to one below it
//! - `"AsKd"` - one explicit combo
//!
//! Past the third character only a trailing `+` matters, so `"AKsx"` reads
//! as `"AKs"`.
//!
//! Tokens that do not fit any of these shapes are dropped without error so a
//! half-typed range still yields the hands it clearly names.

use std::collections::BTreeSet;

use tracing::trace;

use crate::cards::{Card, Hand, Rank, Suit};

/// A set of concrete two-card combos.
pub type Range = BTreeSet<Hand>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suitedness {
    Suited,
    Offsuit,
}

/// Expands `spec` into the combos it denotes. Unknown tokens are skipped.
pub fn parse_range(spec: &str) -> Range {
    let mut range = Range::new();
    let cleaned: String = spec.chars().filter(|c| !c.is_whitespace()).collect();

    for token in cleaned.split(',').filter(|token| !token.is_empty()) {
        if !add_token(&mut range, token) {
            trace!(token, "skipping unrecognised range token");
        }
    }

    range
}

fn add_token(range: &mut Range, token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 2 {
        return false;
    }

    // a four-character token is a concrete combo when it reads as two cards;
    // otherwise only a trailing '+' is significant
    if chars.len() == 4 && chars[3] != '+' && add_explicit_combo(range, &chars) {
        return true;
    }

    let (Ok(first), Ok(second)) = (Rank::from_char(chars[0]), Rank::from_char(chars[1])) else {
        return false;
    };

    if first == second {
        return match &chars[2..] {
            [] => {
                add_pair_combos(range, first);
                true
            }
            ['+'] => {
                for rank in Rank::ALL.iter().filter(|rank| **rank >= first) {
                    add_pair_combos(range, *rank);
                }
                true
            }
            _ => false,
        };
    }

    if chars.len() < 3 {
        return false;
    }

    let (high, low) = if first > second {
        (first, second)
    } else {
        (second, first)
    };
    let suitedness = match chars[2].to_ascii_lowercase() {
        's' => Suitedness::Suited,
        'o' => Suitedness::Offsuit,
        _ => return false,
    };

    if chars.get(3) == Some(&'+') {
        for kicker in Rank::ALL.iter().filter(|rank| **rank >= low && **rank < high) {
            add_unpaired_combos(range, high, *kicker, suitedness);
        }
    } else {
        add_unpaired_combos(range, high, low, suitedness);
    }
    true
}

fn add_explicit_combo(range: &mut Range, chars: &[char]) -> bool {
    let first = Card::from_chars(chars[0], chars[1]);
    let second = Card::from_chars(chars[2], chars[3]);
    match (first, second) {
        (Ok(first), Ok(second)) => match Hand::new(first, second) {
            Ok(hand) => {
                range.insert(hand);
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}

fn add_pair_combos(range: &mut Range, rank: Rank) {
    for (i, s1) in Suit::ALL.iter().enumerate() {
        for s2 in &Suit::ALL[i + 1..] {
            insert(range, Card::new(rank, *s1), Card::new(rank, *s2));
        }
    }
}

fn add_unpaired_combos(range: &mut Range, high: Rank, low: Rank, suitedness: Suitedness) {
    for s1 in Suit::ALL {
        for s2 in Suit::ALL {
            let keep = match suitedness {
                Suitedness::Suited => s1 == s2,
                Suitedness::Offsuit => s1 != s2,
            };
            if keep {
                insert(range, Card::new(high, s1), Card::new(low, s2));
            }
        }
    }
}

fn insert(range: &mut Range, first: Card, second: Card) {
    if let Ok(hand) = Hand::new(first, second) {
        range.insert(hand);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_token_has_six_combos() {
        let range = parse_range("QQ");
        assert_eq!(range.len(), 6);
        assert!(range.iter().all(|hand| hand.is_pair() && hand.high().rank == Rank::Queen));
    }

    #[test]
    fn lowercase_ranks_are_folded() {
        assert_eq!(parse_range("qq"), parse_range("QQ"));
        assert_eq!(parse_range("kaS"), parse_range("AKs"));
    }

    #[test]
    fn reversed_ranks_normalise_high_first() {
        let range = parse_range("KAo");
        assert_eq!(range.len(), 12);
        assert!(range.iter().all(|hand| hand.high().rank == Rank::Ace));
    }

    #[test]
    fn plus_tokens_stop_below_the_high_rank() {
        let range = parse_range("KTs+");
        // KTs, KJs, KQs
        assert_eq!(range.len(), 12);
        assert!(range.iter().all(|hand| hand.low().rank < Rank::King));
    }

    #[test]
    fn malformed_tokens_are_dropped() {
        assert!(parse_range("X, A, AK, AKx, QQs, 1Zs").is_empty());
        assert_eq!(parse_range("garbage, AKs").len(), 4);
    }

    #[test]
    fn stray_fourth_character_is_ignored() {
        assert_eq!(parse_range("AKsx"), parse_range("AKs"));
        assert_eq!(parse_range("KQo?").len(), 12);
    }

    #[test]
    fn explicit_combos_are_accepted() {
        let range = parse_range("AsKd, AsAs");
        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().next().unwrap().to_string(), "AsKd");
    }
}
