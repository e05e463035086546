pub mod balancer;
pub mod criteria;
pub mod engine;
pub mod sort;
pub mod validation;
pub mod weights;

pub use balancer::{rebalance, BalancePolicy};
pub use criteria::{CriteriaSet, Criterion};
pub use engine::{rank_institutions, round2, score_institution, RankedRow};
pub use sort::{sort_rows, SortColumn, SortDirection, SortSpec};
pub use validation::validate_config;
pub use weights::{
    clamp_weight, Normalization, WeightVector, CRITERIA_COUNT, MAX_WEIGHT, MIN_WEIGHT,
    SUM_TOLERANCE, WEIGHT_BUDGET,
};
