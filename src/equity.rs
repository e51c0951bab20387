//! Monte Carlo equity against a range.
//!
//! The simulation budget is split evenly across the opponent combos that
//! survive card removal, so every combo gets sampled no matter how small
//! its share of the range. Combos are independent and run on rayon; each
//! one draws from its own RNG seeded from the call seed and the combo's
//! position, which keeps seeded results identical however the work is
//! scheduled.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::cards::{Card, Hand, remaining_deck};
use crate::error::{Error, Result};
use crate::evaluator::{BitmaskEvaluator, HandEvaluator};
use crate::range::Range;

pub const DEFAULT_SIMULATIONS: u32 = 10_000;

/// Cooperative stop signal, checked before each opponent combo.
///
/// Clones share the same flag, so one token can stop every call of a sweep.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    pub simulations: u32,
    pub seed: Option<u64>,
    pub cancel: Option<CancelToken>,
}

impl SimulationOptions {
    pub fn new(simulations: u32) -> Self {
        Self {
            simulations,
            ..Self::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn cancellable(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Outcome counts of one equity run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EquityReport {
    pub wins: u64,
    pub ties: u64,
    pub losses: u64,
    /// Opponent combos left after removing those blocked by known cards.
    pub combos: usize,
    /// Combos that were actually simulated.
    pub combos_run: usize,
    /// Set when a cancel token stopped the run before every combo was seen.
    pub interrupted: bool,
}

impl EquityReport {
    pub fn simulations(&self) -> u64 {
        self.wins + self.ties + self.losses
    }

    /// `(wins + ties / 2) / simulations`, or 1.0 when nothing was simulated:
    /// an opponent with no legal holding cannot contest the pot.
    pub fn equity(&self) -> f64 {
        match self.simulations() {
            0 => 1.0,
            n => (self.wins as f64 + 0.5 * self.ties as f64) / n as f64,
        }
    }

    pub fn win_probability(&self) -> f64 {
        match self.simulations() {
            0 => 1.0,
            n => self.wins as f64 / n as f64,
        }
    }

    pub fn tie_probability(&self) -> f64 {
        match self.simulations() {
            0 => 0.0,
            n => self.ties as f64 / n as f64,
        }
    }

    pub fn loss_probability(&self) -> f64 {
        match self.simulations() {
            0 => 0.0,
            n => self.losses as f64 / n as f64,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            wins: self.wins + other.wins,
            ties: self.ties + other.ties,
            losses: self.losses + other.losses,
            combos: self.combos.max(other.combos),
            combos_run: self.combos_run + other.combos_run,
            interrupted: self.interrupted || other.interrupted,
        }
    }
}

/// Runs equity simulations with an injected evaluator.
#[derive(Clone)]
pub struct EquitySimulator {
    evaluator: Arc<dyn HandEvaluator>,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl fmt::Debug for EquitySimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquitySimulator")
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

impl Default for EquitySimulator {
    fn default() -> Self {
        Self::new(Arc::new(BitmaskEvaluator))
    }
}

impl EquitySimulator {
    pub fn new(evaluator: Arc<dyn HandEvaluator>) -> Self {
        Self {
            evaluator,
            pool: None,
        }
    }

    /// Runs simulations on a dedicated pool of `threads` workers instead of
    /// rayon's global pool.
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("equity-{index}"))
            .build()?;
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(hero = %hero, board = board.len(), range = range.len(), sims = options.simulations)
    )]
    pub fn simulate(
        &self,
        hero: &Hand,
        range: &Range,
        board: &[Card],
        options: &SimulationOptions,
    ) -> Result<EquityReport> {
        let known = known_cards(hero, board)?;

        if range.is_empty() {
            debug!("empty opponent range, opponent always folds");
            return Ok(EquityReport::default());
        }

        let valid: Vec<Hand> = range
            .iter()
            .filter(|combo| combo.mask() & known == 0)
            .copied()
            .collect();
        if valid.is_empty() {
            debug!("every opponent combo is blocked by known cards");
            return Ok(EquityReport::default());
        }

        let draw = 5 - board.len();
        let per_combo = (options.simulations as usize / valid.len()).max(1);
        let base_seed = options.seed.unwrap_or_else(rand::random);

        let job = || {
            valid
                .par_iter()
                .enumerate()
                .map(|(index, combo)| {
                    if options.is_cancelled() {
                        return EquityReport {
                            interrupted: true,
                            ..EquityReport::default()
                        };
                    }
                    let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
                    self.run_combo(hero, board, known, combo, draw, per_combo, &mut rng)
                })
                .reduce(EquityReport::default, EquityReport::merge)
        };
        let mut report = match &self.pool {
            Some(pool) => pool.install(job),
            None => job(),
        };
        report.combos = valid.len();

        if report.interrupted {
            warn!(
                combos_run = report.combos_run,
                combos = report.combos,
                "equity simulation interrupted, returning partial estimate"
            );
        }
        debug!(
            simulations = report.simulations(),
            equity = report.equity(),
            "equity simulation finished"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_combo(
        &self,
        hero: &Hand,
        board: &[Card],
        known: u64,
        combo: &Hand,
        draw: usize,
        iterations: usize,
        rng: &mut StdRng,
    ) -> EquityReport {
        let mut deck = remaining_deck(known | combo.mask());
        if deck.len() < draw {
            return EquityReport::default();
        }

        let mut hero_cards = [hero.high(); 7];
        let mut villain_cards = [combo.high(); 7];
        hero_cards[1] = hero.low();
        villain_cards[1] = combo.low();
        let filled = 2 + board.len();
        hero_cards[2..filled].copy_from_slice(board);
        villain_cards[2..filled].copy_from_slice(board);

        let mut report = EquityReport {
            combos_run: 1,
            ..EquityReport::default()
        };
        for _ in 0..iterations {
            let (runout, _) = deck.partial_shuffle(rng, draw);
            hero_cards[filled..].copy_from_slice(runout);
            villain_cards[filled..].copy_from_slice(runout);

            let hero_score = self.evaluator.score(&hero_cards);
            let villain_score = self.evaluator.score(&villain_cards);
            // lower score wins
            match hero_score.cmp(&villain_score) {
                std::cmp::Ordering::Less => report.wins += 1,
                std::cmp::Ordering::Equal => report.ties += 1,
                std::cmp::Ordering::Greater => report.losses += 1,
            }
        }
        report
    }
}

fn known_cards(hero: &Hand, board: &[Card]) -> Result<u64> {
    if board.len() > 5 {
        return Err(Error::InvalidBoard(format!(
            "{} community cards, at most 5 allowed",
            board.len()
        )));
    }
    let mut known = hero.mask();
    for card in board {
        if known & card.bit() != 0 {
            return Err(Error::DuplicateCard(*card));
        }
        known |= card.bit();
    }
    Ok(known)
}

/// Equity of `hero` against `range` on `board`, using the default
/// evaluator. Returns a value in `[0, 1]`.
pub fn equity(
    hero: &Hand,
    range: &Range,
    board: &[Card],
    simulations: u32,
    seed: Option<u64>,
) -> Result<f64> {
    let options = SimulationOptions {
        simulations,
        seed,
        cancel: None,
    };
    EquitySimulator::default()
        .simulate(hero, range, board, &options)
        .map(|report| report.equity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ExhaustiveEvaluator;
    use crate::range::parse_range;

    fn hand(input: &str) -> Hand {
        input.parse().unwrap()
    }

    #[test]
    fn empty_range_gives_full_equity() {
        let report = EquitySimulator::default()
            .simulate(&hand("7c2d"), &Range::new(), &[], &SimulationOptions::new(100))
            .unwrap();
        assert_eq!(report.equity(), 1.0);
        assert_eq!(report.simulations(), 0);
    }

    #[test]
    fn fully_blocked_range_gives_full_equity() {
        let board = crate::cards::parse_cards("AdAc2h").unwrap();
        let range = parse_range("AsAh, AhAd");
        let report = EquitySimulator::default()
            .simulate(&hand("AsKd"), &range, &board, &SimulationOptions::new(100))
            .unwrap();
        assert_eq!(report.combos, 0);
        assert_eq!(report.equity(), 1.0);
    }

    #[test]
    fn budget_is_split_across_valid_combos() {
        let range = parse_range("QQ");
        let report = EquitySimulator::default()
            .simulate(&hand("AsKd"), &range, &[], &SimulationOptions::new(600).seeded(3))
            .unwrap();
        assert_eq!(report.combos, 6);
        assert_eq!(report.simulations(), 600);
    }

    #[test]
    fn every_combo_gets_one_draw_when_budget_is_small() {
        let range = parse_range("22+");
        let report = EquitySimulator::default()
            .simulate(&hand("AsKd"), &range, &[], &SimulationOptions::new(10).seeded(3))
            .unwrap();
        assert_eq!(report.simulations(), report.combos as u64);
    }

    #[test]
    fn river_board_is_deterministic() {
        let board = crate::cards::parse_cards("AhKh2c7d9s").unwrap();
        let range = parse_range("QQ");
        let report = EquitySimulator::default()
            .simulate(&hand("AsAd"), &range, &board, &SimulationOptions::new(60))
            .unwrap();
        assert_eq!(report.equity(), 1.0);
        assert_eq!(report.losses, 0);
    }

    #[test]
    fn duplicate_board_card_is_rejected() {
        let board = crate::cards::parse_cards("As7c8d").unwrap();
        let err = EquitySimulator::default()
            .simulate(&hand("AsKd"), &parse_range("QQ"), &board, &SimulationOptions::new(10))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateCard(_)));
    }

    #[test]
    fn cancelled_token_interrupts_run() {
        let token = CancelToken::new();
        token.cancel();
        let options = SimulationOptions::new(1_000).cancellable(token);
        let report = EquitySimulator::default()
            .simulate(&hand("AsKd"), &parse_range("QQ+"), &[], &options)
            .unwrap();
        assert!(report.interrupted);
        assert_eq!(report.combos_run, 0);
        assert_eq!(report.equity(), 1.0);
    }

    #[test]
    fn injected_evaluators_give_identical_seeded_results() {
        let range = parse_range("TT+, AQs+");
        let options = SimulationOptions::new(2_000).seeded(17);
        let fast = EquitySimulator::default()
            .simulate(&hand("9s9h"), &range, &[], &options)
            .unwrap();
        let exhaustive = EquitySimulator::new(Arc::new(ExhaustiveEvaluator))
            .simulate(&hand("9s9h"), &range, &[], &options)
            .unwrap();
        assert_eq!(fast, exhaustive);
    }

    #[test]
    fn dedicated_pool_matches_global_pool() {
        let range = parse_range("JJ+");
        let options = SimulationOptions::new(1_200).seeded(5);
        let global = EquitySimulator::default()
            .simulate(&hand("AsKd"), &range, &[], &options)
            .unwrap();
        let pooled = EquitySimulator::default()
            .with_threads(2)
            .unwrap()
            .simulate(&hand("AsKd"), &range, &[], &options)
            .unwrap();
        assert_eq!(global, pooled);
    }
}
