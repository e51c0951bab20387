//! Expected value of a fold, call or raise.
//!
//! Every calculation here is heads-up: when more than two players are at
//! the table, the opponent range is read as the combined continuing range of
//! all opponents and equity is computed against it as one hand. Callers
//! that need true multi-way equity must not rely on these numbers.

use serde::Serialize;
use tracing::{instrument, warn};

use crate::equity::{EquityReport, EquitySimulator, SimulationOptions};
use crate::error::{Error, Result};
use crate::game::Action;
use crate::icm::{check_field, icm_value};
use crate::range::parse_range;
use crate::scenario::PokerScenario;

/// How a chip outcome is converted into value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "payouts")]
pub enum Valuation {
    Chips,
    /// Tournament money through ICM, payouts ordered from first place.
    Icm(Vec<f64>),
}

impl Valuation {
    pub fn from_flags(use_icm: bool, payout_structure: Option<&[f64]>) -> Result<Self> {
        match (use_icm, payout_structure) {
            (false, _) => Ok(Valuation::Chips),
            (true, Some(payouts)) if !payouts.is_empty() => Ok(Valuation::Icm(payouts.to_vec())),
            (true, _) => Err(Error::MissingPayoutStructure),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvOutcome {
    pub action: Action,
    pub bet_size: f64,
    /// Chips put at risk by the action.
    pub risk: f64,
    /// Chips won when the hand is won.
    pub reward: f64,
    pub ev: f64,
    pub equity: Option<f64>,
    pub report: Option<EquityReport>,
    pub valuation: Valuation,
}

impl EvOutcome {
    fn fold(valuation: &Valuation) -> Self {
        Self {
            action: Action::Fold,
            bet_size: 0.0,
            risk: 0.0,
            reward: 0.0,
            ev: 0.0,
            equity: None,
            report: None,
            valuation: valuation.clone(),
        }
    }

    pub fn interrupted(&self) -> bool {
        self.report.is_some_and(|report| report.interrupted)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvCalculator {
    simulator: EquitySimulator,
    options: SimulationOptions,
}

impl EvCalculator {
    pub fn new(simulator: EquitySimulator, options: SimulationOptions) -> Self {
        Self { simulator, options }
    }

    /// EV of `action` for `player_name`, as a plain number.
    pub fn chip_ev(
        &self,
        scenario: &PokerScenario,
        player_name: &str,
        opponent_range_spec: &str,
        action: Action,
        bet_size: f64,
        valuation: &Valuation,
    ) -> Result<f64> {
        self.evaluate(scenario, player_name, opponent_range_spec, action, bet_size, valuation)
            .map(|outcome| outcome.ev)
    }

    /// EV of `action` for `player_name` with the equity behind it.
    ///
    /// Fold is worth exactly zero and never runs a simulation. Call risks
    /// `bet_size` to win the pot as it stands, which must already hold the
    /// bet being called. Raise risks `bet_size` to win the pot plus a full
    /// call of the raise; fold equity is not modelled.
    #[instrument(level = "debug", skip(self, scenario, valuation), fields(pot = scenario.pot))]
    pub fn evaluate(
        &self,
        scenario: &PokerScenario,
        player_name: &str,
        opponent_range_spec: &str,
        action: Action,
        bet_size: f64,
        valuation: &Valuation,
    ) -> Result<EvOutcome> {
        let (seat, player) = scenario
            .player(player_name)
            .ok_or_else(|| Error::PlayerNotFound(player_name.to_string()))?;
        let hand = player
            .hole_cards
            .ok_or_else(|| Error::MissingHoleCards(player_name.to_string()))?;

        let valuation = match valuation {
            Valuation::Icm(payouts) if payouts.is_empty() => {
                return Err(Error::MissingPayoutStructure);
            }
            Valuation::Icm(payouts) if payouts.len() > scenario.players.len() => {
                warn!(
                    payouts = payouts.len(),
                    players = scenario.players.len(),
                    "payout structure longer than the field, truncating"
                );
                Valuation::Icm(payouts[..scenario.players.len()].to_vec())
            }
            other => other.clone(),
        };
        if let Valuation::Icm(payouts) = &valuation {
            check_field(scenario.players.len(), payouts.len())?;
        }

        if action == Action::Fold {
            return Ok(EvOutcome::fold(&valuation));
        }

        if !bet_size.is_finite() || bet_size < 0.0 || (action == Action::Raise && bet_size <= 0.0) {
            return Err(Error::InvalidBetSize(bet_size));
        }

        if scenario.players.len() > 2 {
            warn!(
                players = scenario.players.len(),
                "multi-way pot, treating the range as the combined continuing range"
            );
        }

        let range = parse_range(opponent_range_spec);
        let report = self
            .simulator
            .simulate(&hand, &range, &scenario.community_cards, &self.options)?;
        let equity = report.equity();

        let risk = bet_size;
        let (reward, matched) = match action {
            Action::Raise => (scenario.pot + bet_size, bet_size),
            _ => (scenario.pot, 0.0),
        };

        let ev = match &valuation {
            Valuation::Chips => equity * reward - (1.0 - equity) * risk,
            Valuation::Icm(payouts) => {
                let final_pot = scenario.pot + risk + matched;
                icm_delta(&scenario.stacks(), seat, payouts, &report, final_pot, risk)
            }
        };

        Ok(EvOutcome {
            action,
            bet_size,
            risk,
            reward,
            ev,
            equity: Some(equity),
            report: Some(report),
            valuation,
        })
    }
}

/// Expected change in ICM value of `seat` over the win, loss and tie
/// branches. Only the acting player's stack moves, floored at zero.
///
/// `final_pot` is the pot once the action is matched: `pot + bet` for a
/// call, whose facing bet is already in `pot`, and `pot + 2 * bet` for a
/// raise that gets called.
fn icm_delta(
    stacks: &[f64],
    seat: usize,
    payouts: &[f64],
    report: &EquityReport,
    final_pot: f64,
    contribution: f64,
) -> f64 {
    let before = icm_value(stacks, payouts)[seat];
    let value_after = |chip_change: f64| {
        let mut after = stacks.to_vec();
        after[seat] = (after[seat] + chip_change).max(0.0);
        icm_value(&after, payouts)[seat]
    };

    let branches = [
        (report.win_probability(), final_pot - contribution),
        (report.loss_probability(), -contribution),
        (report.tie_probability(), final_pot / 2.0 - contribution),
    ];
    let expected: f64 = branches
        .iter()
        .filter(|(probability, _)| *probability > 0.0)
        .map(|(probability, change)| probability * value_after(*change))
        .sum();
    expected - before
}

/// EV with a default simulator: 10 000 simulations, optional seed.
#[allow(clippy::too_many_arguments)]
pub fn chip_ev(
    scenario: &PokerScenario,
    player_name: &str,
    opponent_range_spec: &str,
    action: Action,
    bet_size: f64,
    use_icm: bool,
    payout_structure: Option<&[f64]>,
    seed: Option<u64>,
) -> Result<f64> {
    let valuation = Valuation::from_flags(use_icm, payout_structure)?;
    let options = SimulationOptions {
        simulations: crate::equity::DEFAULT_SIMULATIONS,
        seed,
        cancel: None,
    };
    EvCalculator::new(EquitySimulator::default(), options).chip_ev(
        scenario,
        player_name,
        opponent_range_spec,
        action,
        bet_size,
        &valuation,
    )
}
