use std::collections::VecDeque;

use super::gesture::Gesture;
use super::DashboardError;
use crate::scoring::{clamp_weight, WeightVector, CRITERIA_COUNT};

/// The five slider widgets.
///
/// User input goes through [`SliderBank::drag`], which queues a gesture for
/// the view model. Programmatic updates go through [`SliderBank::sync`], which
/// only moves the handles and never queues anything, so feeding rebalanced
/// weights back to the sliders cannot trigger another rebalance.
#[derive(Debug, Clone)]
pub struct SliderBank {
    values: [f64; CRITERIA_COUNT],
    queue: VecDeque<Gesture>,
}

impl SliderBank {
    pub fn new(weights: &WeightVector) -> Self {
        Self {
            values: *weights.as_array(),
            queue: VecDeque::new(),
        }
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn values(&self) -> &[f64; CRITERIA_COUNT] {
        &self.values
    }

    /// The user moved slider `index` to `value`.
    pub fn drag(&mut self, index: usize, value: f64) -> Result<(), DashboardError> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or(DashboardError::InvalidSlider(index))?;
        let value = clamp_weight(value);
        *slot = value;
        self.queue.push_back(Gesture::SliderDrag { index, value });
        Ok(())
    }

    /// Move every handle to `weights` without raising events.
    pub fn sync(&mut self, weights: &WeightVector) {
        self.values = *weights.as_array();
    }

    pub fn next_gesture(&mut self) -> Option<Gesture> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
