use serde::{Deserialize, Serialize};

use super::weights::CRITERIA_COUNT;

/// A single ranking criterion.
///
/// `code` is the short column name used in the data file (e.g. "TLR"),
/// `name` is what the sliders and help text show.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Criterion {
    pub code: String,
    pub name: String,
}

impl Criterion {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// The fixed, ordered set of five criteria.
///
/// Order drives slider order, weight order and column order.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaSet {
    criteria: [Criterion; CRITERIA_COUNT],
}

impl CriteriaSet {
    pub fn new(criteria: [Criterion; CRITERIA_COUNT]) -> Self {
        Self { criteria }
    }

    /// Build from a config list. Fails unless exactly five criteria are given.
    pub fn from_slice(criteria: &[Criterion]) -> anyhow::Result<Self> {
        let criteria: [Criterion; CRITERIA_COUNT] = criteria.to_vec().try_into().map_err(
            |v: Vec<Criterion>| {
                anyhow::anyhow!(
                    "expected exactly {} criteria, found {}",
                    CRITERIA_COUNT,
                    v.len()
                )
            },
        )?;
        Ok(Self { criteria })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Criterion> {
        self.criteria.get(index)
    }

    pub fn codes(&self) -> [&str; CRITERIA_COUNT] {
        std::array::from_fn(|i| self.criteria[i].code.as_str())
    }

    /// Position of a criterion by its short code (case-insensitive).
    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.criteria
            .iter()
            .position(|c| c.code.eq_ignore_ascii_case(code))
    }
}

impl Default for CriteriaSet {
    /// The engineering ranking framework's five parameters.
    fn default() -> Self {
        Self::new([
            Criterion::new("TLR", "Teaching, Learning & Resources"),
            Criterion::new("RPC", "Research and Professional Practice"),
            Criterion::new("GO", "Graduation Outcomes"),
            Criterion::new("OI", "Outreach and Inclusivity"),
            Criterion::new("Perception", "Perception"),
        ])
    }
}
