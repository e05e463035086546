pub mod gesture;
pub mod sliders;
pub mod view_model;

pub use gesture::{Gesture, Update};
pub use sliders::SliderBank;
pub use view_model::ViewModel;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("no slider at index {0}")]
    InvalidSlider(usize),
    #[error("no subset named '{0}'")]
    UnknownSubset(String),
    #[error("no column for criterion index {0}")]
    InvalidColumn(usize),
}
