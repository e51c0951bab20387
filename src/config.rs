use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::advisor::{Advisor, DEFAULT_RAISE_MULTIPLIERS};
use crate::equity::{CancelToken, DEFAULT_SIMULATIONS, EquitySimulator, SimulationOptions};
use crate::evaluator::{BitmaskEvaluator, ExhaustiveEvaluator, HandEvaluator};
use crate::ev::EvCalculator;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    #[default]
    Bitmask,
    Exhaustive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub simulations: u32,
    pub seed: Option<u64>,
    /// Dedicated worker count; rayon's global pool when unset.
    pub threads: Option<usize>,
    /// Per-call deadline, after which a partial estimate is returned.
    pub timeout_ms: Option<u64>,
    pub evaluator: EvaluatorKind,
    pub raise_multipliers: Vec<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
            threads: None,
            timeout_ms: None,
            evaluator: EvaluatorKind::Bitmask,
            raise_multipliers: DEFAULT_RAISE_MULTIPLIERS.to_vec(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn simulator(&self) -> Result<EquitySimulator> {
        let evaluator: Arc<dyn HandEvaluator> = match self.evaluator {
            EvaluatorKind::Bitmask => Arc::new(BitmaskEvaluator),
            EvaluatorKind::Exhaustive => Arc::new(ExhaustiveEvaluator),
        };
        let simulator = EquitySimulator::new(evaluator);
        match self.threads {
            Some(threads) => Ok(simulator.with_threads(threads)?),
            None => Ok(simulator),
        }
    }

    /// Options for one call. The timeout clock starts here.
    pub fn options(&self) -> SimulationOptions {
        SimulationOptions {
            simulations: self.simulations,
            seed: self.seed,
            cancel: self
                .timeout_ms
                .map(|ms| CancelToken::with_timeout(Duration::from_millis(ms))),
        }
    }

    pub fn calculator(&self) -> Result<EvCalculator> {
        Ok(EvCalculator::new(self.simulator()?, self.options()))
    }

    pub fn advisor(&self) -> Result<Advisor> {
        Ok(Advisor::new(self.calculator()?, self.raise_multipliers.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "simulations": 500 }"#).unwrap();
        assert_eq!(config.simulations, 500);
        assert_eq!(config.raise_multipliers, DEFAULT_RAISE_MULTIPLIERS.to_vec());
        assert_eq!(config.evaluator, EvaluatorKind::Bitmask);
    }

    #[test]
    fn timeout_produces_cancel_token() {
        let config = EngineConfig {
            timeout_ms: Some(10_000),
            ..EngineConfig::default()
        };
        let options = config.options();
        assert!(options.cancel.is_some_and(|token| !token.is_cancelled()));
    }
}
