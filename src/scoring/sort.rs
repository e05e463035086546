use std::cmp::Ordering;
use std::fmt;

use anyhow::{bail, Result};

use super::criteria::CriteriaSet;
use super::engine::RankedRow;
use super::weights::CRITERIA_COUNT;

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Rank,
    InstituteId,
    Name,
    Score,
    /// Sub-score column for the criterion at this index.
    Criterion(usize),
}

impl SortColumn {
    /// Columns in table order: Rank, Institute Id, Name, the criteria, Score.
    pub fn all() -> Vec<SortColumn> {
        let mut columns = vec![SortColumn::Rank, SortColumn::InstituteId, SortColumn::Name];
        columns.extend((0..CRITERIA_COUNT).map(SortColumn::Criterion));
        columns.push(SortColumn::Score);
        columns
    }

    pub fn title(self, criteria: &CriteriaSet) -> String {
        match self {
            SortColumn::Rank => "Rank".to_string(),
            SortColumn::InstituteId => "Institute Id".to_string(),
            SortColumn::Name => "Name".to_string(),
            SortColumn::Score => "Score".to_string(),
            SortColumn::Criterion(i) => criteria
                .get(i)
                .map(|c| c.code.clone())
                .unwrap_or_else(|| format!("#{}", i)),
        }
    }

    /// Parse a column id: `rank`, `id`, `name`, `score`, or a criterion code.
    pub fn parse(s: &str, criteria: &CriteriaSet) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "rank" => return Ok(SortColumn::Rank),
            "id" | "institute id" | "institute_id" => return Ok(SortColumn::InstituteId),
            "name" => return Ok(SortColumn::Name),
            "score" => return Ok(SortColumn::Score),
            _ => {}
        }
        match criteria.index_of(s) {
            Some(i) => Ok(SortColumn::Criterion(i)),
            None => bail!("Unknown column: {}", s),
        }
    }

    fn compare(self, a: &RankedRow, b: &RankedRow) -> Ordering {
        match self {
            SortColumn::Rank => a.rank.cmp(&b.rank),
            SortColumn::InstituteId => a.institution.id.cmp(&b.institution.id),
            SortColumn::Name => a
                .institution
                .name
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.institution.name.chars().flat_map(char::to_lowercase)),
            SortColumn::Score => a.score.total_cmp(&b.score),
            // Out-of-range criteria compare equal, leaving the input order
            SortColumn::Criterion(i) => {
                match (a.institution.subscores.get(i), b.institution.subscores.get(i)) {
                    (Some(x), Some(y)) => x.total_cmp(y),
                    _ => Ordering::Equal,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// A user-chosen sort that overrides the default score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse `COLUMN[:asc|desc]`. Direction defaults to ascending.
    pub fn parse(s: &str, criteria: &CriteriaSet) -> Result<Self> {
        let (column, direction) = match s.rsplit_once(':') {
            Some((column, "asc")) => (column, SortDirection::Ascending),
            Some((column, "desc")) => (column, SortDirection::Descending),
            Some((_, other)) => bail!("Sort direction must be asc or desc, got '{}'", other),
            None => (s, SortDirection::Ascending),
        };
        Ok(Self {
            column: SortColumn::parse(column, criteria)?,
            direction,
        })
    }

    /// Next state after a click on `column`'s header.
    ///
    /// A new column starts ascending, a second click flips to descending, a
    /// third click clears back to the default score order.
    pub fn after_header_click(current: Option<SortSpec>, column: SortColumn) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Ascending => Some(SortSpec {
                    column,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortSpec {
                column,
                direction: SortDirection::Ascending,
            }),
        }
    }
}

/// Stable sort of ranked rows by a custom column.
///
/// Rows comparing equal keep their current relative order, so sorting the
/// score-ranked output by a column breaks ties by score rank.
pub fn sort_rows(rows: &mut [RankedRow], spec: SortSpec) {
    match spec.direction {
        SortDirection::Ascending => rows.sort_by(|a, b| spec.column.compare(a, b)),
        SortDirection::Descending => rows.sort_by(|a, b| spec.column.compare(b, a)),
    }
}
