use serde::{Deserialize, Serialize};

use crate::cards::{Card, Hand, parse_cards};
use crate::error::{Error, Result};
use crate::game::Street;

pub const HERO_NAME: &str = "Hero";

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub stack: f64,
    pub hole_cards: Option<Hand>,
}

impl Player {
    pub fn new(name: impl Into<String>, stack: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidScenario("player name must not be empty".into()));
        }
        if !stack.is_finite() || stack < 0.0 {
            return Err(Error::InvalidScenario(format!(
                "stack of '{name}' must be a non-negative number, got {stack}"
            )));
        }
        Ok(Self {
            name,
            stack,
            hole_cards: None,
        })
    }

    pub fn with_hole_cards(mut self, hand: Hand) -> Self {
        self.hole_cards = Some(hand);
        self
    }
}

/// One decision point. Built by the caller, read-only to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PokerScenario {
    pub players: Vec<Player>,
    pub small_blind: f64,
    pub big_blind: f64,
    pub ante: f64,
    pub pot: f64,
    pub community_cards: Vec<Card>,
    pub street: Street,
}

impl PokerScenario {
    /// Validates the table and seeds the pot with blinds and antes.
    pub fn new(players: Vec<Player>, small_blind: f64, big_blind: f64, ante: f64) -> Result<Self> {
        if players.len() < 2 {
            return Err(Error::InvalidScenario("at least two players are required".into()));
        }
        if !(small_blind > 0.0 && small_blind.is_finite()) {
            return Err(Error::InvalidScenario(format!(
                "small blind must be positive, got {small_blind}"
            )));
        }
        if !(big_blind > 0.0 && big_blind.is_finite()) {
            return Err(Error::InvalidScenario(format!(
                "big blind must be positive, got {big_blind}"
            )));
        }
        if !(ante >= 0.0 && ante.is_finite()) {
            return Err(Error::InvalidScenario(format!(
                "ante must be non-negative, got {ante}"
            )));
        }

        let pot = small_blind + big_blind + players.len() as f64 * ante;
        Ok(Self {
            players,
            small_blind,
            big_blind,
            ante,
            pot,
            community_cards: Vec::new(),
            street: Street::Preflop,
        })
    }

    /// Deals the community cards and moves to the matching street.
    pub fn with_board(mut self, cards: Vec<Card>) -> Result<Self> {
        let street = Street::from_board_len(cards.len()).ok_or_else(|| {
            Error::InvalidBoard(format!(
                "{} community cards, expected 0, 3, 4 or 5",
                cards.len()
            ))
        })?;
        for (index, card) in cards.iter().enumerate() {
            if cards[..index].contains(card) {
                return Err(Error::DuplicateCard(*card));
            }
            let holder = self
                .players
                .iter()
                .find(|player| player.hole_cards.is_some_and(|hand| hand.contains(*card)));
            if let Some(player) = holder {
                return Err(Error::InvalidBoard(format!(
                    "{card} is both on the board and in {}'s hand",
                    player.name
                )));
            }
        }
        self.community_cards = cards;
        self.street = street;
        Ok(self)
    }

    pub fn with_pot(mut self, pot: f64) -> Result<Self> {
        if !(pot >= 0.0 && pot.is_finite()) {
            return Err(Error::InvalidScenario(format!("pot must be non-negative, got {pot}")));
        }
        self.pot = pot;
        Ok(self)
    }

    pub fn player(&self, name: &str) -> Option<(usize, &Player)> {
        self.players
            .iter()
            .enumerate()
            .find(|(_, player)| player.name == name)
    }

    pub fn stacks(&self) -> Vec<f64> {
        self.players.iter().map(|player| player.stack).collect()
    }
}

/// Plain-text description of a decision point, as typed on the command line
/// or posted to the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSpec {
    /// Hero hole cards, e.g. `"AsKd"`.
    pub hero: String,
    #[serde(default)]
    pub board: String,
    /// Stacks with the hero first.
    #[serde(default = "default_stacks")]
    pub stacks: Vec<f64>,
    #[serde(default = "default_small_blind")]
    pub small_blind: f64,
    #[serde(default = "default_big_blind")]
    pub big_blind: f64,
    #[serde(default)]
    pub ante: f64,
    /// Overrides the blinds-and-antes pot.
    #[serde(default)]
    pub pot: Option<f64>,
}

fn default_stacks() -> Vec<f64> {
    vec![1000.0, 1000.0]
}

fn default_small_blind() -> f64 {
    1.0
}

fn default_big_blind() -> f64 {
    2.0
}

impl ScenarioSpec {
    pub fn new(hero: impl Into<String>) -> Self {
        Self {
            hero: hero.into(),
            board: String::new(),
            stacks: default_stacks(),
            small_blind: default_small_blind(),
            big_blind: default_big_blind(),
            ante: 0.0,
            pot: None,
        }
    }

    /// Builds the scenario. The hero is named [`HERO_NAME`], opponents
    /// `Villain 1`, `Villain 2` and so on.
    pub fn build(&self) -> Result<PokerScenario> {
        let hand: Hand = self.hero.parse()?;
        let board = parse_cards(&self.board)?;

        let players = self
            .stacks
            .iter()
            .enumerate()
            .map(|(seat, stack)| match seat {
                0 => Player::new(HERO_NAME, *stack).map(|player| player.with_hole_cards(hand)),
                n => Player::new(format!("Villain {n}"), *stack),
            })
            .collect::<Result<Vec<_>>>()?;

        let scenario = PokerScenario::new(players, self.small_blind, self.big_blind, self.ante)?
            .with_board(board)?;
        match self.pot {
            Some(pot) => scenario.with_pot(pot),
            None => Ok(scenario),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_up() -> Vec<Player> {
        vec![
            Player::new("Hero", 1000.0).unwrap(),
            Player::new("Villain", 1000.0).unwrap(),
        ]
    }

    #[test]
    fn pot_starts_with_blinds_and_antes() {
        let scenario = PokerScenario::new(heads_up(), 1.0, 2.0, 0.25).unwrap();
        assert_eq!(scenario.pot, 3.5);
        assert_eq!(scenario.street, Street::Preflop);
    }

    #[test]
    fn single_player_is_rejected() {
        let players = vec![Player::new("Hero", 100.0).unwrap()];
        assert!(matches!(
            PokerScenario::new(players, 1.0, 2.0, 0.0),
            Err(Error::InvalidScenario(_))
        ));
    }

    #[test]
    fn negative_stack_is_rejected() {
        assert!(Player::new("Hero", -1.0).is_err());
        assert!(Player::new("", 10.0).is_err());
    }

    #[test]
    fn board_sets_street() {
        let board = parse_cards("AhKh2c7d").unwrap();
        let scenario = PokerScenario::new(heads_up(), 1.0, 2.0, 0.0)
            .unwrap()
            .with_board(board)
            .unwrap();
        assert_eq!(scenario.street, Street::Turn);
    }

    #[test]
    fn two_card_board_is_rejected() {
        let board = parse_cards("AhKh").unwrap();
        let result = PokerScenario::new(heads_up(), 1.0, 2.0, 0.0)
            .unwrap()
            .with_board(board);
        assert!(matches!(result, Err(Error::InvalidBoard(_))));
    }

    #[test]
    fn spec_rejects_board_overlapping_hero() {
        let spec = ScenarioSpec {
            board: "As7c8d".into(),
            ..ScenarioSpec::new("AsKd")
        };
        assert!(matches!(spec.build(), Err(Error::InvalidBoard(_))));
    }

    #[test]
    fn spec_names_players_and_overrides_pot() {
        let spec = ScenarioSpec {
            stacks: vec![500.0, 800.0, 1200.0],
            pot: Some(40.0),
            ..ScenarioSpec::new("AsKd")
        };
        let scenario = spec.build().unwrap();
        assert_eq!(scenario.pot, 40.0);
        assert_eq!(scenario.players[2].name, "Villain 2");
        assert!(scenario.player(HERO_NAME).unwrap().1.hole_cards.is_some());
    }
}
