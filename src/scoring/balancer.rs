//! Slider rebalancing.
//!
//! When one slider moves, [`rebalance`] produces the complete new weight
//! vector. Under [`BalancePolicy::SumPreserving`] the untouched sliders absorb
//! the change in proportion to their previous shares, so the five weights keep
//! summing to [`WEIGHT_BUDGET`].

use serde::{Deserialize, Serialize};

use super::weights::{
    clamp_weight, Normalization, WeightVector, CRITERIA_COUNT, MAX_WEIGHT, MIN_WEIGHT,
    WEIGHT_BUDGET,
};

/// Below this, the non-dragged sliders are treated as holding no budget.
const EMPTY_REMAINDER: f64 = 1e-9;

/// Redistribution policy applied on every slider drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePolicy {
    /// Keep the sum at 100 by scaling the other four sliders.
    #[default]
    SumPreserving,
    /// Move only the dragged slider; scoring normalizes by the sum instead.
    Unconstrained,
}

impl BalancePolicy {
    /// The scoring regime that matches this policy.
    pub fn normalization(self) -> Normalization {
        match self {
            BalancePolicy::SumPreserving => Normalization::FixedBudget,
            BalancePolicy::Unconstrained => Normalization::Proportional,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BalancePolicy::SumPreserving => "sum to 100",
            BalancePolicy::Unconstrained => "proportional",
        }
    }
}

/// Compute the weights after slider `index` is dragged to `value`.
///
/// `value` is clamped to the slider range first. `previous` is not modified.
///
/// # Panics
///
/// Panics if `index >= CRITERIA_COUNT`; callers hold validated indices.
pub fn rebalance(
    previous: &WeightVector,
    index: usize,
    value: f64,
    policy: BalancePolicy,
) -> WeightVector {
    let value = clamp_weight(value);
    match policy {
        BalancePolicy::Unconstrained => {
            let mut next = *previous.as_array();
            next[index] = value;
            WeightVector::new(next)
        }
        BalancePolicy::SumPreserving => preserve_sum(previous, index, value),
    }
}

fn preserve_sum(previous: &WeightVector, index: usize, value: f64) -> WeightVector {
    let old = previous.as_array();
    let budget_left = WEIGHT_BUDGET - value;

    // Equal to 100 - old[index] while the invariant holds. Summing the others
    // directly keeps float drift from compounding across drags.
    let remainder: f64 = old
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(_, w)| *w)
        .sum();

    let mut next = [0.0; CRITERIA_COUNT];
    if remainder <= EMPTY_REMAINDER {
        // The dragged slider held the whole budget, so the others carry no
        // proportions to preserve. Split what is left evenly.
        let share = budget_left / (CRITERIA_COUNT - 1) as f64;
        for (j, slot) in next.iter_mut().enumerate() {
            if j != index {
                *slot = share;
            }
        }
    } else {
        for (j, slot) in next.iter_mut().enumerate() {
            if j != index {
                *slot = (old[j] / remainder * budget_left).clamp(MIN_WEIGHT, MAX_WEIGHT);
            }
        }
    }
    next[index] = value;

    WeightVector::new(next)
}
