use super::weights::{Normalization, WeightVector};
use crate::data::Institution;

/// One institution with its computed score and rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: usize,
    pub institution: Institution,
    /// Unrounded weighted score. Use [`RankedRow::display_score`] for output.
    pub score: f64,
}

impl RankedRow {
    /// Score rounded to two decimals for display. Sorting never uses this.
    pub fn display_score(&self) -> f64 {
        round2(self.score)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted score of one institution.
///
/// Returns 0 when the weights have nothing to normalize by (proportional
/// regime with an all-zero vector).
pub fn score_institution(
    institution: &Institution,
    weights: &WeightVector,
    normalization: Normalization,
) -> f64 {
    match weights.multipliers(normalization) {
        Some(multipliers) => institution
            .subscores
            .iter()
            .zip(multipliers.iter())
            .map(|(subscore, m)| subscore * m)
            .sum(),
        None => 0.0,
    }
}

/// Score, sort and rank every institution.
///
/// Rows are ordered by score descending. Equal scores keep their input order
/// (the sort is stable), and ranks run 1..=n with no gaps or shared ranks.
pub fn rank_institutions(
    institutions: &[Institution],
    weights: &WeightVector,
    normalization: Normalization,
) -> Vec<RankedRow> {
    if weights.multipliers(normalization).is_none() && !institutions.is_empty() {
        tracing::debug!("weights sum to zero, every score falls back to 0");
    }

    let mut rows: Vec<RankedRow> = institutions
        .iter()
        .map(|institution| RankedRow {
            rank: 0,
            score: score_institution(institution, weights, normalization),
            institution: institution.clone(),
        })
        .collect();

    // sort_by is stable; total_cmp keeps NaN from scrambling the order
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));

    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }

    rows
}
