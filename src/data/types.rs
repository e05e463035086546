use serde::Serialize;

use crate::scoring::CRITERIA_COUNT;

/// One institution as loaded from the data file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Institution {
    pub id: String,
    pub name: String,
    /// Pre-computed sub-scores, in criterion order.
    pub subscores: [f64; CRITERIA_COUNT],
}

impl Institution {
    /// Display label, falling back to the id for unnamed rows.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
