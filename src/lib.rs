pub mod advisor;
pub mod cards;
pub mod config;
pub mod equity;
pub mod error;
pub mod ev;
pub mod evaluator;
pub mod game;
pub mod icm;
pub mod range;
pub mod report;
pub mod scenario;
pub mod web;

pub use advisor::{Advisor, Recommendation};
pub use cards::{Card, Hand};
pub use config::EngineConfig;
pub use equity::{CancelToken, EquityReport, EquitySimulator, SimulationOptions, equity};
pub use error::{Error, Result};
pub use ev::{EvCalculator, EvOutcome, Valuation, chip_ev};
pub use evaluator::{BitmaskEvaluator, ExhaustiveEvaluator, HandEvaluator};
pub use game::Action;
pub use icm::{checked_icm_value, icm_value};
pub use range::{Range, parse_range};
pub use scenario::{Player, PokerScenario, ScenarioSpec};
