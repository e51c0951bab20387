//! Independent Chip Model.
//!
//! Finish probabilities follow Malmuth-Harville: the next place goes to each
//! remaining player in proportion to their share of the remaining chips.
//! Since that choice only depends on which players are already placed, the
//! recursion is memoised per set of placed players, one layer per paid
//! place.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Largest number of memoised placement states a single ICM evaluation may
/// visit. Sixteen players with every place paid fit; seventeen do not.
pub const MAX_ICM_STATES: u64 = 1 << 16;

/// Placement states visited for `players` stacks and `payouts` paid places:
/// the sum of `C(players, k)` for every `k` below the number of places.
pub fn icm_states(players: usize, payouts: usize) -> u64 {
    let places = payouts.min(players) as u64;
    let players = players as u64;
    let mut subsets: u64 = 1;
    let mut total: u64 = 0;
    for k in 0..places {
        total = total.saturating_add(subsets);
        // C(n, k + 1) = C(n, k) * (n - k) / (k + 1), exact in integers
        subsets = match subsets.checked_mul(players - k) {
            Some(product) => product / (k + 1),
            None => u64::MAX,
        };
    }
    total
}

/// Rejects fields whose ICM evaluation would exceed [`MAX_ICM_STATES`].
pub fn check_field(players: usize, payouts: usize) -> Result<()> {
    if icm_states(players, payouts) > MAX_ICM_STATES {
        return Err(Error::IcmFieldTooLarge {
            players,
            places: payouts.min(players),
        });
    }
    Ok(())
}

/// [`icm_value`] behind the [`check_field`] size guard.
pub fn checked_icm_value(stacks: &[f64], payouts: &[f64]) -> Result<Vec<f64>> {
    check_field(stacks.len(), payouts.len())?;
    Ok(icm_value(stacks, payouts))
}

/// Expected payout of each stack.
///
/// `payouts[0]` is first place. Places past the end of `payouts` pay nothing
/// and payouts past the number of players are ignored. Negative or NaN
/// stacks count as empty.
///
/// Time and memory grow with [`icm_states`], roughly `2^n` when every place
/// is paid. No size check happens here; callers handling untrusted input go
/// through [`checked_icm_value`].
pub fn icm_value(stacks: &[f64], payouts: &[f64]) -> Vec<f64> {
    let stacks: Vec<f64> = stacks
        .iter()
        .map(|stack| if stack.is_nan() { 0.0 } else { stack.max(0.0) })
        .collect();
    let players = stacks.len();
    let places = payouts.len().min(players);
    let mut values = vec![0.0; players];
    if places == 0 {
        return values;
    }

    // placed players (sorted indices) -> probability of that set taking the
    // top places in some order
    let mut layer: HashMap<Vec<usize>, f64> = HashMap::from([(Vec::new(), 1.0)]);

    for (place, payout) in payouts.iter().take(places).enumerate() {
        let mut next: HashMap<Vec<usize>, f64> = HashMap::with_capacity(layer.len() * players);
        for (placed, probability) in &layer {
            let remaining: Vec<usize> = (0..players).filter(|i| !placed.contains(i)).collect();
            let chips: f64 = remaining.iter().map(|i| stacks[*i]).sum();

            for &player in &remaining {
                let share = if chips > 0.0 {
                    stacks[player] / chips
                } else {
                    1.0 / remaining.len() as f64
                };
                if share == 0.0 {
                    continue;
                }
                let reach = probability * share;
                values[player] += reach * payout;

                if place + 1 < places {
                    let mut key = placed.clone();
                    let at = key.partition_point(|i| *i < player);
                    key.insert(at, player);
                    *next.entry(key).or_insert(0.0) += reach;
                }
            }
        }
        layer = next;
    }

    values
}
