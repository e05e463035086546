use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

use crate::config::SubsetConfig;
use crate::data::Institution;

const NAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A named group of institutions that can be hidden or shown as a whole.
#[derive(Debug, Clone)]
pub struct Subset {
    pub name: String,
    patterns: Vec<Pattern>,
    ids: Vec<String>,
    pub included: bool,
}

impl Subset {
    pub fn compile(config: &SubsetConfig) -> Result<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .with_context(|| format!("subset '{}': invalid pattern '{}'", config.name, p))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: config.name.clone(),
            patterns,
            ids: config.ids.clone(),
            included: config.included,
        })
    }

    /// Membership by exact id or by a name pattern (case-insensitive).
    pub fn contains(&self, institution: &Institution) -> bool {
        self.ids.iter().any(|id| id == &institution.id)
            || self
                .patterns
                .iter()
                .any(|p| p.matches_with(&institution.name, NAME_MATCH))
    }
}

/// Inclusion flags for every configured subset.
#[derive(Debug, Clone, Default)]
pub struct SubsetState {
    subsets: Vec<Subset>,
}

impl SubsetState {
    pub fn from_config(configs: &[SubsetConfig]) -> Result<Self> {
        let subsets = configs.iter().map(Subset::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self { subsets })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subset> {
        self.subsets.iter()
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Subset> {
        self.subsets.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Flip a subset's inclusion flag.
    /// Returns the new flag, or None if no subset has that name.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let subset = self
            .subsets
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))?;
        subset.included = !subset.included;
        Some(subset.included)
    }

    /// Visible unless the institution belongs to an excluded subset.
    pub fn is_visible(&self, institution: &Institution) -> bool {
        !self
            .subsets
            .iter()
            .any(|s| !s.included && s.contains(institution))
    }

    /// Log subsets that match nothing; usually a typo in a pattern.
    pub fn warn_unmatched(&self, institutions: &[Institution]) {
        for subset in &self.subsets {
            if !institutions.iter().any(|i| subset.contains(i)) {
                tracing::warn!(subset = %subset.name, "subset matches no institutions");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn institution(id: &str, name: &str) -> Institution {
        Institution {
            id: id.to_string(),
            name: name.to_string(),
            subscores: [0.0; 5],
        }
    }

    fn iit_config() -> SubsetConfig {
        SubsetConfig {
            name: "IITs".to_string(),
            patterns: vec!["Indian Institute of Technology*".to_string()],
            ids: vec![],
            included: true,
        }
    }

    #[test]
    fn test_pattern_membership_case_insensitive() {
        let subset = Subset::compile(&iit_config()).unwrap();
        assert!(subset.contains(&institution("1", "Indian Institute of Technology Bombay")));
        assert!(subset.contains(&institution("2", "indian institute of technology (ISM) Dhanbad")));
        assert!(!subset.contains(&institution("3", "National Institute of Technology Warangal")));
    }

    #[test]
    fn test_id_membership() {
        let config = SubsetConfig {
            name: "Picked".to_string(),
            patterns: vec![],
            ids: vec!["IR-1".to_string()],
            included: true,
        };
        let subset = Subset::compile(&config).unwrap();
        assert!(subset.contains(&institution("IR-1", "Anything")));
        assert!(!subset.contains(&institution("IR-2", "Anything")));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = SubsetConfig {
            name: "Bad".to_string(),
            patterns: vec!["[unclosed".to_string()],
            ids: vec![],
            included: true,
        };
        let err = Subset::compile(&config).unwrap_err();
        assert!(err.to_string().contains("subset 'Bad'"));
    }

    #[test]
    fn test_toggle_flips_and_reports() {
        let mut state = SubsetState::from_config(&[iit_config()]).unwrap();
        assert_eq!(state.toggle("iits"), Some(false));
        assert_eq!(state.toggle("IITs"), Some(true));
        assert_eq!(state.toggle("NITs"), None);
    }

    #[test]
    fn test_visibility_follows_flag() {
        let mut state = SubsetState::from_config(&[iit_config()]).unwrap();
        let iit = institution("1", "Indian Institute of Technology Delhi");
        let other = institution("2", "Some College");

        assert!(state.is_visible(&iit));
        state.toggle("IITs");
        assert!(!state.is_visible(&iit));
        assert!(state.is_visible(&other));
    }
}
