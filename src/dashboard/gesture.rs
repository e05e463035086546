use crate::scoring::{SortColumn, SortSpec};

/// One user action, tagged with where it came from.
///
/// The balancer only ever runs for `SliderDrag`, which carries the index of
/// the slider the user actually moved.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    SliderDrag { index: usize, value: f64 },
    Reset,
    ToggleSubset(String),
    HeaderClick(SortColumn),
    /// Sort set directly (e.g. from the command line); None restores score order.
    SortBy(Option<SortSpec>),
}

/// What the view should refresh after a gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Weights now shown on the sliders
    pub weights: crate::scoring::WeightVector,
    /// Whether the scores changed (as opposed to only the row order)
    pub rescored: bool,
}
