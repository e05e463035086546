use serde::{Deserialize, Serialize};

/// Number of criteria (and sliders). Fixed by the ranking framework.
pub const CRITERIA_COUNT: usize = 5;

/// Total budget shared by the sliders under the sum-preserving policy.
pub const WEIGHT_BUDGET: f64 = 100.0;

/// Slider bounds.
pub const MIN_WEIGHT: f64 = 0.0;
pub const MAX_WEIGHT: f64 = 100.0;

/// Tolerance for the sum-to-100 invariant.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// How raw weights turn into score multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Weights already sum to 100; divide by the fixed budget.
    FixedBudget,
    /// Only relative proportions matter; divide by the current sum.
    Proportional,
}

/// Five weights, one per criterion, in criterion order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WeightVector([f64; CRITERIA_COUNT]);

impl WeightVector {
    pub const fn new(weights: [f64; CRITERIA_COUNT]) -> Self {
        Self(weights)
    }

    pub fn from_slice(weights: &[f64]) -> Option<Self> {
        let array: [f64; CRITERIA_COUNT] = weights.try_into().ok()?;
        Some(Self(array))
    }

    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn as_array(&self) -> &[f64; CRITERIA_COUNT] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Sum equals the budget within [`SUM_TOLERANCE`].
    pub fn sums_to_budget(&self) -> bool {
        (self.sum() - WEIGHT_BUDGET).abs() <= SUM_TOLERANCE
    }

    /// Every component inside `[MIN_WEIGHT, MAX_WEIGHT]`.
    pub fn in_bounds(&self) -> bool {
        self.0
            .iter()
            .all(|w| w.is_finite() && (MIN_WEIGHT..=MAX_WEIGHT).contains(w))
    }

    /// Per-criterion multipliers for scoring.
    ///
    /// Returns `None` under [`Normalization::Proportional`] when the weights
    /// sum to zero, since there is nothing to divide by.
    pub fn multipliers(&self, normalization: Normalization) -> Option<[f64; CRITERIA_COUNT]> {
        let normalizer = match normalization {
            Normalization::FixedBudget => WEIGHT_BUDGET,
            Normalization::Proportional => self.sum(),
        };
        if normalizer <= 0.0 {
            return None;
        }
        Some(std::array::from_fn(|i| self.0[i] / normalizer))
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self([30.0, 30.0, 20.0, 10.0, 10.0])
    }
}

/// Clamp raw slider input into the slider range. NaN maps to the minimum.
pub fn clamp_weight(value: f64) -> f64 {
    if value.is_nan() {
        MIN_WEIGHT
    } else {
        value.clamp(MIN_WEIGHT, MAX_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sums_to_budget() {
        assert!(WeightVector::default().sums_to_budget());
        assert!(WeightVector::default().in_bounds());
    }

    #[test]
    fn test_fixed_budget_multipliers() {
        let w = WeightVector::new([30.0, 30.0, 20.0, 10.0, 10.0]);
        let m = w.multipliers(Normalization::FixedBudget).unwrap();
        assert_eq!(m, [0.3, 0.3, 0.2, 0.1, 0.1]);
    }

    #[test]
    fn test_proportional_multipliers_use_sum() {
        let w = WeightVector::new([90.0, 90.0, 60.0, 30.0, 30.0]);
        let m = w.multipliers(Normalization::Proportional).unwrap();
        assert!((m[0] - 0.3).abs() < 1e-12);
        assert!((m[4] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_proportional_zero_sum_has_no_multipliers() {
        let w = WeightVector::new([0.0; CRITERIA_COUNT]);
        assert!(w.multipliers(Normalization::Proportional).is_none());
    }

    #[test]
    fn test_clamp_weight() {
        assert_eq!(clamp_weight(-5.0), 0.0);
        assert_eq!(clamp_weight(150.0), 100.0);
        assert_eq!(clamp_weight(42.5), 42.5);
        assert_eq!(clamp_weight(f64::NAN), 0.0);
    }

    #[test]
    fn test_from_slice_requires_five() {
        assert!(WeightVector::from_slice(&[1.0, 2.0]).is_none());
        assert!(WeightVector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_some());
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_string(&WeightVector::default()).unwrap();
        assert_eq!(json, "[30.0,30.0,20.0,10.0,10.0]");
    }
}
