use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{round2, BalancePolicy, CriteriaSet, RankedRow, WeightVector};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Two-decimal display form of a score ("69.46")
pub fn format_score(score: f64) -> String {
    format!("{:.2}", round2(score))
}

/// Compact weight ("30", "13.3")
pub fn format_weight(weight: f64) -> String {
    let rounded = (weight * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// One-line weight summary: "TLR 30  RPC 30  GO 20  OI 10  Perception 10  (sum to 100)"
pub fn format_weights(weights: &WeightVector, criteria: &CriteriaSet, policy: BalancePolicy) -> String {
    let parts: Vec<String> = criteria
        .iter()
        .zip(weights.iter())
        .map(|(c, w)| format!("{} {}", c.code, format_weight(w)))
        .collect();
    format!("{}  ({})", parts.join("  "), policy.label())
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked rows as a table: Rank, Score, Name, Institute Id.
/// Rank column: 4 chars, right-aligned with trailing dot.
/// Score column: 6 chars, right-aligned, two decimals.
pub fn format_ranked_table(rows: &[RankedRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No institutions to rank.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 4;
    let score_width = 6;
    let separator = "  ";

    rows.iter()
        .map(|row| {
            let rank_str = format!("{:>width$}.", row.rank, width = rank_width - 1);
            let score_str = format!("{:>width$}", format_score(row.score), width = score_width);

            let id = &row.institution.id;
            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + id.len();

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(row.institution.label(), width - fixed_width)
                } else {
                    truncate_name(row.institution.label(), 20)
                }
            } else {
                row.institution.label().to_string()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_str.bold(),
                    separator,
                    name,
                    separator,
                    id.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_str, separator, name, separator, id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line breakdown of one row: each criterion's sub-score, weight and
/// contribution to the final score.
pub fn format_row_detail(
    row: &RankedRow,
    criteria: &CriteriaSet,
    weights: &WeightVector,
    policy: BalancePolicy,
    use_colors: bool,
) -> String {
    let multipliers = weights.multipliers(policy.normalization());
    let mut lines = Vec::new();

    let heading = format!("{}. {} ({})", row.rank, row.institution.label(), row.institution.id);
    if use_colors {
        lines.push(heading.bold().to_string());
    } else {
        lines.push(heading);
    }

    for (i, criterion) in criteria.iter().enumerate() {
        let subscore = row.institution.subscores[i];
        let contribution = multipliers.map(|m| m[i] * subscore).unwrap_or(0.0);
        lines.push(format!(
            "  {:<12} {:>6.2} x {:>5}  = {:>6.2}",
            criterion.code,
            subscore,
            format_weight(weights.get(i)),
            contribution
        ));
    }
    lines.push(format!("  {:<12} {:>26}", "Score", format_score(row.score)));

    lines.join("\n")
}

/// Format rows as tab-separated values for scripting
/// Columns: rank, score, id, name, then one sub-score per criterion (no headers, no colors)
pub fn format_tsv(rows: &[RankedRow]) -> String {
    rows.iter()
        .map(|row| {
            let mut fields = vec![
                row.rank.to_string(),
                format_score(row.score),
                row.institution.id.clone(),
                row.institution.name.clone(),
            ];
            fields.extend(row.institution.subscores.iter().map(|s| s.to_string()));
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    policy: BalancePolicy,
    criteria: Vec<&'a str>,
    weights: &'a WeightVector,
    rows: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    score: f64,
    subscores: &'a [f64],
}

/// Format rows as a JSON document. Sub-scores are listed in `criteria` order
/// and scores are rounded to two decimals.
pub fn format_json(
    rows: &[RankedRow],
    criteria: &CriteriaSet,
    weights: &WeightVector,
    policy: BalancePolicy,
) -> Result<String> {
    let report = JsonReport {
        policy,
        criteria: criteria.iter().map(|c| c.code.as_str()).collect(),
        weights,
        rows: rows
            .iter()
            .map(|row| JsonRow {
                rank: row.rank,
                id: &row.institution.id,
                name: &row.institution.name,
                score: row.display_score(),
                subscores: &row.institution.subscores,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize ranking as JSON")
}
