use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::ev::{EvCalculator, EvOutcome, Valuation};
use crate::game::Action;
use crate::scenario::PokerScenario;

pub const DEFAULT_RAISE_MULTIPLIERS: [f64; 4] = [2.5, 3.0, 3.5, 4.0];

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub best: EvOutcome,
    /// Fold, call, then every raise size tried, in that order.
    pub candidates: Vec<EvOutcome>,
    pub interrupted: bool,
}

/// Sweeps fold, call and a ladder of raise sizes and keeps the best EV.
#[derive(Debug, Clone)]
pub struct Advisor {
    calculator: EvCalculator,
    raise_multipliers: Vec<f64>,
}

impl Advisor {
    pub fn new(calculator: EvCalculator, raise_multipliers: Vec<f64>) -> Self {
        Self {
            calculator,
            raise_multipliers,
        }
    }

    /// Raise sizes are `big_blind * multiplier`, capped at the effective
    /// stack and skipped below a min-raise of two big blinds. Ties keep the
    /// earlier candidate, so fold wins a dead heat.
    #[instrument(level = "debug", skip(self, scenario, valuation))]
    pub fn recommend(
        &self,
        scenario: &PokerScenario,
        player_name: &str,
        opponent_range_spec: &str,
        amount_to_call: f64,
        valuation: &Valuation,
    ) -> Result<Recommendation> {
        let (_, hero) = scenario
            .player(player_name)
            .ok_or_else(|| Error::PlayerNotFound(player_name.to_string()))?;
        let effective_stack = scenario
            .players
            .iter()
            .filter(|player| player.name != player_name)
            .map(|player| player.stack)
            .fold(0.0, f64::max)
            .min(hero.stack);
        let min_raise = scenario.big_blind * 2.0;

        let evaluate = |action: Action, size: f64| {
            self.calculator
                .evaluate(scenario, player_name, opponent_range_spec, action, size, valuation)
        };

        let mut candidates = vec![
            evaluate(Action::Fold, 0.0)?,
            evaluate(Action::Call, amount_to_call)?,
        ];
        for multiplier in &self.raise_multipliers {
            let size = (scenario.big_blind * multiplier).min(effective_stack);
            if size < min_raise {
                debug!(size, min_raise, "raise below minimum, skipping");
                continue;
            }
            candidates.push(evaluate(Action::Raise, size)?);
        }

        let best = candidates
            .iter()
            .skip(1)
            .fold(&candidates[0], |best, candidate| {
                if candidate.ev > best.ev { candidate } else { best }
            })
            .clone();
        let interrupted = candidates.iter().any(EvOutcome::interrupted);

        Ok(Recommendation {
            best,
            candidates,
            interrupted,
        })
    }
}
