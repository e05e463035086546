use super::types::SubsetState;
use crate::data::Institution;

/// Institutions not hidden by any excluded subset, in their original order.
pub fn filter_visible(institutions: &[Institution], state: &SubsetState) -> Vec<Institution> {
    institutions
        .iter()
        .filter(|i| state.is_visible(i))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubsetConfig;

    fn institution(id: &str, name: &str) -> Institution {
        Institution {
            id: id.to_string(),
            name: name.to_string(),
            subscores: [0.0; 5],
        }
    }

    fn state() -> SubsetState {
        SubsetState::from_config(&[
            SubsetConfig {
                name: "IITs".to_string(),
                patterns: vec!["Indian Institute of Technology*".to_string()],
                ids: vec![],
                included: true,
            },
            SubsetConfig {
                name: "NITs".to_string(),
                patterns: vec!["National Institute of Technology*".to_string()],
                ids: vec![],
                included: true,
            },
        ])
        .unwrap()
    }

    fn sample() -> Vec<Institution> {
        vec![
            institution("1", "Indian Institute of Technology Madras"),
            institution("2", "National Institute of Technology Karnataka"),
            institution("3", "Anna University"),
            institution("4", "Indian Institute of Technology Roorkee"),
        ]
    }

    #[test]
    fn test_all_included_keeps_everything() {
        let visible = filter_visible(&sample(), &state());
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn test_excluded_subset_hidden_order_kept() {
        let mut state = state();
        state.toggle("IITs");
        let visible = filter_visible(&sample(), &state);
        let ids: Vec<_> = visible.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_both_excluded_leaves_unaffiliated() {
        let mut state = state();
        state.toggle("IITs");
        state.toggle("NITs");
        let visible = filter_visible(&sample(), &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "3");
    }

    #[test]
    fn test_no_subsets_configured() {
        let visible = filter_visible(&sample(), &SubsetState::default());
        assert_eq!(visible.len(), 4);
    }
}
