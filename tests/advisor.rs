use poker_ev::advisor::{Advisor, DEFAULT_RAISE_MULTIPLIERS};
use poker_ev::equity::{EquitySimulator, SimulationOptions};
use poker_ev::ev::{EvCalculator, Valuation};
use poker_ev::game::Action;
use poker_ev::scenario::{HERO_NAME, ScenarioSpec};

fn advisor(multipliers: &[f64]) -> Advisor {
    Advisor::new(
        EvCalculator::new(
            EquitySimulator::default(),
            SimulationOptions::new(2_000).seeded(17),
        ),
        multipliers.to_vec(),
    )
}

#[test]
fn trash_facing_a_big_bet_folds() {
    let scenario = ScenarioSpec::new("7c2d").build().unwrap();
    let recommendation = advisor(&DEFAULT_RAISE_MULTIPLIERS)
        .recommend(&scenario, HERO_NAME, "QQ+, AKs", 200.0, &Valuation::Chips)
        .unwrap();
    assert_eq!(recommendation.best.action, Action::Fold);
    assert_eq!(recommendation.best.ev, 0.0);
    assert!(!recommendation.interrupted);
}

#[test]
fn candidates_are_fold_call_then_raises_in_order() {
    let scenario = ScenarioSpec::new("AsAh").build().unwrap();
    let recommendation = advisor(&[2.5, 4.0])
        .recommend(&scenario, HERO_NAME, "22+", 2.0, &Valuation::Chips)
        .unwrap();
    let actions: Vec<(Action, f64)> = recommendation
        .candidates
        .iter()
        .map(|candidate| (candidate.action, candidate.bet_size))
        .collect();
    assert_eq!(
        actions,
        vec![
            (Action::Fold, 0.0),
            (Action::Call, 2.0),
            (Action::Raise, 5.0),
            (Action::Raise, 8.0),
        ]
    );
    let best_ev = recommendation
        .candidates
        .iter()
        .map(|candidate| candidate.ev)
        .fold(f64::MIN, f64::max);
    assert_eq!(recommendation.best.ev, best_ev);
}

#[test]
fn raises_are_capped_at_the_effective_stack() {
    let scenario = ScenarioSpec {
        stacks: vec![1000.0, 7.0],
        ..ScenarioSpec::new("AsAh")
    }
    .build()
    .unwrap();
    let recommendation = advisor(&DEFAULT_RAISE_MULTIPLIERS)
        .recommend(&scenario, HERO_NAME, "KK", 2.0, &Valuation::Chips)
        .unwrap();
    assert!(
        recommendation
            .candidates
            .iter()
            .filter(|candidate| candidate.action == Action::Raise)
            .all(|candidate| candidate.bet_size <= 7.0)
    );
}

#[test]
fn sweep_under_icm_reports_dollar_values() {
    let scenario = ScenarioSpec {
        stacks: vec![400.0, 600.0, 1000.0],
        ..ScenarioSpec::new("AsAh")
    }
    .build()
    .unwrap();
    let recommendation = advisor(&[3.0])
        .recommend(
            &scenario,
            HERO_NAME,
            "JJ+",
            2.0,
            &Valuation::Icm(vec![50.0, 30.0, 20.0]),
        )
        .unwrap();
    assert_eq!(recommendation.candidates.len(), 3);
    assert!(matches!(recommendation.best.valuation, Valuation::Icm(_)));
}
