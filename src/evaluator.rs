//! Hand strength evaluation.
//!
//! Evaluators turn 5 to 7 cards into a score where a lower number is a
//! stronger hand and equal numbers tie. The simulator only ever compares
//! scores, so any implementation honouring that order can be injected.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::cards::{Card, Rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Category plus tie-break ranks, highest significance first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandStrength {
    pub category: HandCategory,
    pub ranks: [u8; 5],
}

/// One above the largest packed strength, so every score is positive.
const SCORE_CEILING: u32 = 9 << 20;

impl HandStrength {
    fn packed(&self) -> u32 {
        self.ranks
            .iter()
            .fold(self.category as u32, |acc, rank| (acc << 4) | *rank as u32)
    }

    /// Lower is stronger.
    pub fn score(&self) -> u32 {
        SCORE_CEILING - self.packed()
    }
}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.ranks.cmp(&other.ranks))
    }
}

/// Scores a set of cards. Lower scores win, equal scores split.
pub trait HandEvaluator: Send + Sync {
    fn score(&self, cards: &[Card]) -> u32;
}

/// Tries every five-card subset and keeps the best.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveEvaluator;

impl HandEvaluator for ExhaustiveEvaluator {
    fn score(&self, cards: &[Card]) -> u32 {
        best_five_card_hand(cards).score()
    }
}

/// Reads the best hand straight off rank counts and per-suit rank masks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmaskEvaluator;

impl HandEvaluator for BitmaskEvaluator {
    fn score(&self, cards: &[Card]) -> u32 {
        evaluate_masks(cards).score()
    }
}

fn fill(mut values: Vec<u8>) -> [u8; 5] {
    values.resize(5, 0);
    [values[0], values[1], values[2], values[3], values[4]]
}

fn evaluate_five(cards: &[Card; 5]) -> HandStrength {
    let mut counts = [0u8; 15];
    let mut suits = [0u8; 4];
    let mut sorted_cards: Vec<u8> = cards.iter().map(|c| c.rank_value()).collect();
    sorted_cards.sort_unstable_by(|a, b| b.cmp(a));

    for card in cards {
        counts[card.rank_value() as usize] += 1;
        suits[card.suit.index()] += 1;
    }

    let is_flush = suits.contains(&5);

    let mut mask: u16 = 0;
    for rank_value in 2u8..=14 {
        if counts[rank_value as usize] > 0 {
            mask |= 1 << rank_value;
        }
    }
    let straight_high = straight_high(mask);

    let mut groups: Vec<(u8, u8)> = (2u8..=14)
        .filter_map(|rank| {
            let count = counts[rank as usize];
            (count > 0).then_some((count, rank))
        })
        .collect();
    groups.sort_unstable_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    if is_flush && let Some(high) = straight_high {
        return HandStrength {
            category: HandCategory::StraightFlush,
            ranks: run_of_five(high),
        };
    }

    let singles = || -> Vec<u8> {
        groups
            .iter()
            .filter(|(c, _)| *c == 1)
            .map(|(_, r)| *r)
            .collect()
    };

    if let Some(&(count, rank)) = groups.first() {
        match count {
            4 => {
                let kicker = singles().first().copied().unwrap_or(0);
                return HandStrength {
                    category: HandCategory::FourOfAKind,
                    ranks: fill(vec![rank, kicker]),
                };
            }
            3 if groups.get(1).is_some_and(|(c, _)| *c == 2) => {
                return HandStrength {
                    category: HandCategory::FullHouse,
                    ranks: fill(vec![rank, groups[1].1]),
                };
            }
            _ => {}
        }
    }

    if is_flush {
        return HandStrength {
            category: HandCategory::Flush,
            ranks: fill(sorted_cards),
        };
    }

    if let Some(high) = straight_high {
        return HandStrength {
            category: HandCategory::Straight,
            ranks: run_of_five(high),
        };
    }

    if let Some(&(count, rank)) = groups.first() {
        match count {
            3 => {
                let mut values = vec![rank];
                values.extend(singles());
                return HandStrength {
                    category: HandCategory::ThreeOfAKind,
                    ranks: fill(values),
                };
            }
            2 if groups.get(1).is_some_and(|(c, _)| *c == 2) => {
                let kicker = singles().first().copied().unwrap_or(0);
                return HandStrength {
                    category: HandCategory::TwoPair,
                    ranks: fill(vec![rank, groups[1].1, kicker]),
                };
            }
            2 => {
                let mut values = vec![rank];
                values.extend(singles());
                return HandStrength {
                    category: HandCategory::OnePair,
                    ranks: fill(values),
                };
            }
            _ => {}
        }
    }

    HandStrength {
        category: HandCategory::HighCard,
        ranks: fill(sorted_cards),
    }
}

/// Best five-card hand among `cards`. Fewer than five cards are ranked as
/// they stand.
pub fn best_five_card_hand(cards: &[Card]) -> HandStrength {
    if cards.len() < 5 {
        return evaluate_masks(cards);
    }
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|combo| evaluate_five(&[combo[0], combo[1], combo[2], combo[3], combo[4]]))
        .max()
        .unwrap_or_else(|| evaluate_masks(cards))
}

fn run_of_five(high: u8) -> [u8; 5] {
    [high, high - 1, high - 2, high - 3, high - 4]
}

/// Highest straight in a mask of rank values (bit `v` set for value `v`).
fn straight_high(mask: u16) -> Option<u8> {
    let mask = if mask & (1 << Rank::Ace.value()) != 0 {
        mask | 1 << 1 // ace plays low in the wheel
    } else {
        mask
    };
    (5u8..=14).rev().find(|high| {
        let needed = 0b11111u16 << (high - 4);
        mask & needed == needed
    })
}

/// Up to `n` distinct rank values present in `mask`, highest first,
/// skipping any in `exclude`.
fn top_ranks(mask: u16, n: usize, exclude: &[u8]) -> Vec<u8> {
    (2u8..=14)
        .rev()
        .filter(|v| mask & (1 << v) != 0 && !exclude.contains(v))
        .take(n)
        .collect()
}

fn evaluate_masks(cards: &[Card]) -> HandStrength {
    let mut counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    let mut suit_masks = [0u16; 4];
    let mut rank_mask: u16 = 0;

    for card in cards {
        let value = card.rank_value();
        counts[value as usize] += 1;
        suit_counts[card.suit.index()] += 1;
        suit_masks[card.suit.index()] |= 1 << value;
        rank_mask |= 1 << value;
    }

    if let Some(suit) = suit_counts.iter().position(|&n| n >= 5) {
        let flush_mask = suit_masks[suit];
        if let Some(high) = straight_high(flush_mask) {
            return HandStrength {
                category: HandCategory::StraightFlush,
                ranks: run_of_five(high),
            };
        }
        return HandStrength {
            category: HandCategory::Flush,
            ranks: fill(top_ranks(flush_mask, 5, &[])),
        };
    }

    let of_count = |n: u8| -> Vec<u8> {
        (2u8..=14)
            .rev()
            .filter(|v| counts[*v as usize] == n)
            .collect()
    };
    let quads = of_count(4);
    let trips = of_count(3);
    let pairs = of_count(2);

    if let Some(&quad) = quads.first() {
        let mut values = vec![quad];
        values.extend(top_ranks(rank_mask, 1, &[quad]));
        return HandStrength {
            category: HandCategory::FourOfAKind,
            ranks: fill(values),
        };
    }

    if let Some(&trip) = trips.first() {
        let pair = trips.get(1).into_iter().chain(pairs.first()).max();
        if let Some(&pair) = pair {
            return HandStrength {
                category: HandCategory::FullHouse,
                ranks: fill(vec![trip, pair]),
            };
        }
    }

    if let Some(high) = straight_high(rank_mask) {
        return HandStrength {
            category: HandCategory::Straight,
            ranks: run_of_five(high),
        };
    }

    if let Some(&trip) = trips.first() {
        let mut values = vec![trip];
        values.extend(top_ranks(rank_mask, 2, &[trip]));
        return HandStrength {
            category: HandCategory::ThreeOfAKind,
            ranks: fill(values),
        };
    }

    match pairs.as_slice() {
        [first, second, ..] => {
            let mut values = vec![*first, *second];
            values.extend(top_ranks(rank_mask, 1, &[*first, *second]));
            HandStrength {
                category: HandCategory::TwoPair,
                ranks: fill(values),
            }
        }
        [pair] => {
            let mut values = vec![*pair];
            values.extend(top_ranks(rank_mask, 3, &[*pair]));
            HandStrength {
                category: HandCategory::OnePair,
                ranks: fill(values),
            }
        }
        [] => HandStrength {
            category: HandCategory::HighCard,
            ranks: fill(top_ranks(rank_mask, 5, &[])),
        },
    }
}
