use serde::{Deserialize, Serialize};

use crate::scoring::{BalancePolicy, CriteriaSet, Criterion};

pub const DEFAULT_DATA_FILE: &str = "sample_data.csv";
pub const DEFAULT_REFERENCE_URL: &str =
    "https://www.nirfindia.org/nirfpdfcdn/2021/framework/Engineering.pdf";

/// Application configuration.
///
/// Every field is optional in the file; missing fields take the defaults
/// below.
///
/// Example YAML:
/// ```yaml
/// data_path: sample_data.csv
/// policy: sum_preserving
/// default_weights: [30, 30, 20, 10, 10]
/// subsets:
///   - name: IITs
///     patterns: ["Indian Institute of Technology*"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CSV with one row per institution
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// How the other sliders react when one moves
    #[serde(default)]
    pub policy: BalancePolicy,

    /// Starting weights, restored by reset
    #[serde(default = "default_weights")]
    pub default_weights: Vec<f64>,

    /// The five criteria, in slider/column order
    #[serde(default = "default_criteria")]
    pub criteria: Vec<Criterion>,

    /// Toggleable institution groups
    #[serde(default)]
    pub subsets: Vec<SubsetConfig>,

    /// How far one key press moves a slider
    #[serde(default = "default_slider_step")]
    pub slider_step: f64,

    #[serde(default)]
    pub theme: ThemeMode,

    /// Methodology document opened from the TUI
    #[serde(default = "default_reference_url")]
    pub reference_url: String,
}

/// A named institution group for the show/hide toggles.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubsetConfig {
    pub name: String,

    /// Glob patterns matched against the institution name (case-insensitive)
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Explicit institution ids
    #[serde(default)]
    pub ids: Vec<String>,

    /// Whether the group starts visible
    #[serde(default = "default_included")]
    pub included: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

fn default_data_path() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_weights() -> Vec<f64> {
    vec![30.0, 30.0, 20.0, 10.0, 10.0]
}

fn default_criteria() -> Vec<Criterion> {
    CriteriaSet::default().iter().cloned().collect()
}

fn default_slider_step() -> f64 {
    1.0
}

fn default_reference_url() -> String {
    DEFAULT_REFERENCE_URL.to_string()
}

fn default_included() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            policy: BalancePolicy::default(),
            default_weights: default_weights(),
            criteria: default_criteria(),
            subsets: vec![
                SubsetConfig {
                    name: "IITs".to_string(),
                    patterns: vec!["Indian Institute of Technology*".to_string()],
                    ids: Vec::new(),
                    included: true,
                },
                SubsetConfig {
                    name: "NITs".to_string(),
                    patterns: vec!["National Institute of Technology*".to_string()],
                    ids: Vec::new(),
                    included: true,
                },
            ],
            slider_step: default_slider_step(),
            theme: ThemeMode::default(),
            reference_url: default_reference_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_weights, vec![30.0, 30.0, 20.0, 10.0, 10.0]);
        assert_eq!(config.policy, BalancePolicy::SumPreserving);
        assert_eq!(config.criteria.len(), 5);
        assert_eq!(config.subsets.len(), 2);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_config_takes_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.data_path, "sample_data.csv");
        assert_eq!(config.default_weights, vec![30.0, 30.0, 20.0, 10.0, 10.0]);
        assert!(config.subsets.is_empty());
        assert_eq!(config.slider_step, 1.0);
        assert_eq!(config.theme, ThemeMode::Auto);
    }

    #[test]
    fn test_unconstrained_variant_parse() {
        let yaml = r#"
policy: unconstrained
default_weights: [90, 90, 60, 30, 30]
theme: dark
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.policy, BalancePolicy::Unconstrained);
        assert_eq!(config.default_weights, vec![90.0, 90.0, 60.0, 30.0, 30.0]);
        assert_eq!(config.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_subset_parse_defaults_included() {
        let yaml = r#"
subsets:
  - name: IITs
    patterns: ["Indian Institute of Technology*"]
  - name: Picked
    ids: ["IR-E-U-0456"]
    included: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.subsets[0].included);
        assert!(config.subsets[0].ids.is_empty());
        assert!(!config.subsets[1].included);
        assert_eq!(config.subsets[1].ids, vec!["IR-E-U-0456".to_string()]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("weights: [1, 2]");
        assert!(result.is_err());
    }
}
