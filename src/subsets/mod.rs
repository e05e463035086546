pub mod filter;
pub mod types;

pub use filter::filter_visible;
pub use types::{Subset, SubsetState};
