use std::collections::HashSet;

use glob::Pattern;

use super::balancer::BalancePolicy;
use super::weights::{WeightVector, CRITERIA_COUNT, MAX_WEIGHT, MIN_WEIGHT};
use crate::config::Config;

/// Validate the configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Criteria: exactly five, unique non-empty codes
    if config.criteria.len() != CRITERIA_COUNT {
        errors.push(format!(
            "criteria: expected exactly {} entries, found {}",
            CRITERIA_COUNT,
            config.criteria.len()
        ));
    }
    let mut seen_codes = HashSet::new();
    for (i, criterion) in config.criteria.iter().enumerate() {
        if criterion.code.trim().is_empty() {
            errors.push(format!("criteria[{}].code: must not be empty", i));
        } else if !seen_codes.insert(criterion.code.to_ascii_lowercase()) {
            errors.push(format!(
                "criteria[{}].code: duplicate code '{}'",
                i, criterion.code
            ));
        }
    }

    // Default weights
    match WeightVector::from_slice(&config.default_weights) {
        None => errors.push(format!(
            "default_weights: expected {} values, found {}",
            CRITERIA_COUNT,
            config.default_weights.len()
        )),
        Some(weights) => {
            for (i, w) in weights.iter().enumerate() {
                if !w.is_finite() || !(MIN_WEIGHT..=MAX_WEIGHT).contains(&w) {
                    errors.push(format!(
                        "default_weights[{}]: {} is outside {}..={}",
                        i, w, MIN_WEIGHT, MAX_WEIGHT
                    ));
                }
            }
            match config.policy {
                BalancePolicy::SumPreserving if !weights.sums_to_budget() => {
                    errors.push(format!(
                        "default_weights: must sum to 100 with policy sum_preserving (sum is {})",
                        weights.sum()
                    ));
                }
                BalancePolicy::Unconstrained if weights.sum() <= 0.0 => {
                    errors.push(
                        "default_weights: at least one weight must be positive".to_string(),
                    );
                }
                _ => {}
            }
        }
    }

    // Subsets
    let mut seen_subsets = HashSet::new();
    for (i, subset) in config.subsets.iter().enumerate() {
        if subset.name.trim().is_empty() {
            errors.push(format!("subsets[{}].name: must not be empty", i));
        } else if !seen_subsets.insert(subset.name.to_ascii_lowercase()) {
            errors.push(format!(
                "subsets[{}].name: duplicate subset '{}'",
                i, subset.name
            ));
        }
        if subset.patterns.is_empty() && subset.ids.is_empty() {
            errors.push(format!(
                "subsets[{}]: needs at least one pattern or id",
                i
            ));
        }
        for (j, pattern) in subset.patterns.iter().enumerate() {
            if let Err(e) = Pattern::new(pattern) {
                errors.push(format!(
                    "subsets[{}].patterns[{}]: invalid '{}' - {}",
                    i, j, pattern, e
                ));
            }
        }
    }

    // Slider step
    if !(config.slider_step > 0.0 && config.slider_step <= MAX_WEIGHT) {
        errors.push(format!(
            "slider_step: must be in (0, 100], got {}",
            config.slider_step
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
