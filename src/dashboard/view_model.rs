use anyhow::{Context, Result};

use super::gesture::{Gesture, Update};
use super::sliders::SliderBank;
use super::DashboardError;
use crate::config::Config;
use crate::data::Institution;
use crate::scoring::{
    rank_institutions, rebalance, sort_rows, BalancePolicy, CriteriaSet, RankedRow, SortColumn,
    SortSpec, WeightVector, CRITERIA_COUNT,
};
use crate::subsets::{filter_visible, SubsetState};

/// Binding layer between the sliders, the balancer and the ranked table.
///
/// Owns the current weights and filter state; every mutation goes through
/// [`ViewModel::handle`], one gesture at a time.
#[derive(Debug, Clone)]
pub struct ViewModel {
    criteria: CriteriaSet,
    policy: BalancePolicy,
    default_weights: WeightVector,
    weights: WeightVector,
    institutions: Vec<Institution>,
    subsets: SubsetState,
    sort: Option<SortSpec>,
    rows: Vec<RankedRow>,
    sliders: SliderBank,
    revision: u64,
}

impl ViewModel {
    pub fn new(
        criteria: CriteriaSet,
        policy: BalancePolicy,
        default_weights: WeightVector,
        institutions: Vec<Institution>,
        subsets: SubsetState,
    ) -> Self {
        let mut vm = Self {
            criteria,
            policy,
            default_weights,
            weights: default_weights,
            institutions,
            subsets,
            sort: None,
            rows: Vec::new(),
            sliders: SliderBank::new(&default_weights),
            revision: 0,
        };
        vm.recompute();
        vm
    }

    /// Build from a validated config and loaded rows.
    pub fn from_config(config: &Config, institutions: Vec<Institution>) -> Result<Self> {
        let criteria = CriteriaSet::from_slice(&config.criteria)?;
        let default_weights = WeightVector::from_slice(&config.default_weights)
            .context("default_weights must have exactly five values")?;
        let subsets = SubsetState::from_config(&config.subsets)?;
        subsets.warn_unmatched(&institutions);
        Ok(Self::new(
            criteria,
            config.policy,
            default_weights,
            institutions,
            subsets,
        ))
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    pub fn policy(&self) -> BalancePolicy {
        self.policy
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn default_weights(&self) -> &WeightVector {
        &self.default_weights
    }

    /// Ranked, filtered rows in display order.
    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn subsets(&self) -> &SubsetState {
        &self.subsets
    }

    pub fn sliders(&self) -> &SliderBank {
        &self.sliders
    }

    pub fn total_institutions(&self) -> usize {
        self.institutions.len()
    }

    /// Number of gestures processed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A user drag on slider `index`: record it on the widget, then process it.
    pub fn drag_slider(&mut self, index: usize, value: f64) -> Result<Update, DashboardError> {
        self.sliders.drag(index, value)?;
        let mut last = None;
        while let Some(gesture) = self.sliders.next_gesture() {
            last = Some(self.handle(gesture)?);
        }
        Ok(last.unwrap_or_else(|| self.snapshot(false)))
    }

    /// Move slider `index` by `delta` from where its handle currently sits.
    pub fn nudge_slider(&mut self, index: usize, delta: f64) -> Result<Update, DashboardError> {
        let current = self
            .sliders
            .value(index)
            .ok_or(DashboardError::InvalidSlider(index))?;
        self.drag_slider(index, current + delta)
    }

    /// Apply one gesture.
    pub fn handle(&mut self, gesture: Gesture) -> Result<Update, DashboardError> {
        tracing::debug!(?gesture, revision = self.revision, "handling gesture");

        let rescored = match gesture {
            Gesture::SliderDrag { index, value } => {
                if index >= CRITERIA_COUNT {
                    return Err(DashboardError::InvalidSlider(index));
                }
                self.weights = rebalance(&self.weights, index, value, self.policy);
                self.sliders.sync(&self.weights);
                true
            }
            Gesture::Reset => {
                self.weights = self.default_weights;
                self.sliders.sync(&self.weights);
                true
            }
            Gesture::ToggleSubset(name) => {
                let included = self
                    .subsets
                    .toggle(&name)
                    .ok_or_else(|| DashboardError::UnknownSubset(name.clone()))?;
                tracing::debug!(subset = %name, included, "toggled subset");
                true
            }
            Gesture::HeaderClick(column) => {
                check_column(column)?;
                self.sort = SortSpec::after_header_click(self.sort, column);
                false
            }
            Gesture::SortBy(spec) => {
                if let Some(spec) = spec {
                    check_column(spec.column)?;
                }
                self.sort = spec;
                false
            }
        };

        self.recompute();
        self.revision += 1;
        Ok(self.snapshot(rescored))
    }

    fn snapshot(&self, rescored: bool) -> Update {
        Update {
            weights: self.weights,
            rescored,
        }
    }

    fn recompute(&mut self) {
        let visible = filter_visible(&self.institutions, &self.subsets);
        let mut rows = rank_institutions(&visible, &self.weights, self.policy.normalization());
        if let Some(spec) = self.sort {
            sort_rows(&mut rows, spec);
        }
        self.rows = rows;
    }
}

fn check_column(column: SortColumn) -> Result<(), DashboardError> {
    match column {
        SortColumn::Criterion(i) if i >= CRITERIA_COUNT => Err(DashboardError::InvalidColumn(i)),
        _ => Ok(()),
    }
}
