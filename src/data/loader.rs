use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use super::types::Institution;
use crate::scoring::{CriteriaSet, CRITERIA_COUNT};

pub const ID_COLUMN: &str = "Institute Id";
pub const NAME_COLUMN: &str = "Name";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open data file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("data file is missing required column '{0}'")]
    MissingColumn(String),
    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
    #[error("data file has no institution rows")]
    Empty,
}

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    name: usize,
    criteria: [usize; CRITERIA_COUNT],
    criteria_codes: [String; CRITERIA_COUNT],
}

impl Columns {
    fn resolve(headers: &StringRecord, criteria: &CriteriaSet) -> Result<Self, DataError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| DataError::MissingColumn(column.to_string()))
        };

        let id = find(ID_COLUMN)?;
        let name = find(NAME_COLUMN)?;

        let codes = criteria.codes();
        let mut positions = [0usize; CRITERIA_COUNT];
        for (slot, code) in positions.iter_mut().zip(codes.iter()) {
            *slot = find(code)?;
        }

        Ok(Self {
            id,
            name,
            criteria: positions,
            criteria_codes: codes.map(str::to_string),
        })
    }

    fn parse(&self, record: &StringRecord) -> Result<Institution, DataError> {
        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let mut subscores = [0.0; CRITERIA_COUNT];
        for (k, slot) in subscores.iter_mut().enumerate() {
            let raw = field(self.criteria[k]);
            // NaN and infinities parse as f64 but cannot be ranked
            *slot = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidNumber {
                    line,
                    column: self.criteria_codes[k].clone(),
                    value: raw.to_string(),
                })?;
        }

        Ok(Institution {
            id: field(self.id).to_string(),
            name: field(self.name).to_string(),
            subscores,
        })
    }
}

/// Load institutions from a CSV file.
///
/// Only the id, name and criterion columns are read; any others are ignored.
/// Fails on the first missing column or unparsable sub-score.
pub fn load_institutions(path: &Path, criteria: &CriteriaSet) -> Result<Vec<Institution>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let institutions = read_institutions(file, criteria)?;
    tracing::debug!(
        path = %path.display(),
        rows = institutions.len(),
        "loaded institutions"
    );
    Ok(institutions)
}

/// Read institutions from any CSV source.
pub fn read_institutions<R: Read>(
    reader: R,
    criteria: &CriteriaSet,
) -> Result<Vec<Institution>, DataError> {
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let columns = Columns::resolve(csv.headers()?, criteria)?;

    let mut institutions = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        institutions.push(columns.parse(&record)?);
    }

    if institutions.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(institutions)
}
