use poker_ev::icm::icm_value;

fn total(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[test]
fn paid_prizes_are_conserved() {
    let cases: [(&[f64], &[f64]); 4] = [
        (&[5000.0, 3000.0, 2000.0], &[50.0, 30.0, 20.0]),
        (&[1200.0, 800.0, 600.0, 400.0, 100.0], &[500.0, 300.0, 200.0]),
        (&[10.0, 10.0], &[70.0, 30.0]),
        (&[9000.0, 1.0, 1.0, 1.0], &[40.0, 30.0, 20.0, 10.0]),
    ];
    for (stacks, payouts) in cases {
        let values = icm_value(stacks, payouts);
        assert_eq!(values.len(), stacks.len());
        let expected: f64 = payouts.iter().take(stacks.len()).sum();
        assert!(
            (total(&values) - expected).abs() < 1e-6,
            "stacks={stacks:?} payouts={payouts:?} values={values:?}"
        );
    }
}

#[test]
fn bigger_stack_is_worth_more_but_less_than_proportionally() {
    let stacks = [6000.0, 3000.0, 1000.0];
    let payouts = [50.0, 30.0, 20.0];
    let values = icm_value(&stacks, &payouts);
    assert!(values[0] > values[1] && values[1] > values[2]);
    // chip leader's share of the prize pool trails their share of chips
    assert!(values[0] / 100.0 < 0.6);
    // short stack is worth more than its chip share
    assert!(values[2] / 100.0 > 0.1);
}

#[test]
fn every_value_is_bounded_by_first_and_last_prize() {
    let payouts = [60.0, 25.0, 15.0];
    let values = icm_value(&[2500.0, 1500.0, 700.0, 300.0], &payouts);
    for value in values {
        assert!((0.0..=60.0).contains(&value));
    }
}

#[test]
fn empty_field_has_no_values() {
    assert!(icm_value(&[], &[100.0]).is_empty());
}

#[test]
fn negative_stack_counts_as_busted() {
    let values = icm_value(&[-50.0, 100.0], &[100.0]);
    assert_eq!(values[0], 0.0);
    assert!((values[1] - 100.0).abs() < 1e-9);
}
