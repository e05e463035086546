use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{ensure_parent_dir, get_config_path, Config};
use crate::scoring::{validate_config, BalancePolicy};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse "30, 30, 20, 10, 10" (commas and/or spaces) into weights.
pub fn parse_weight_list(s: &str) -> Result<Vec<f64>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .with_context(|| format!("'{}' is not a number", part))
        })
        .collect()
}

fn format_weight_list(weights: &[f64]) -> String {
    weights
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serialize `config` and write it atomically to `path`.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// With `accept_defaults`, no questions are asked and the built-in defaults
/// are written (refusing to overwrite an existing file).
pub fn run_init_wizard(default_path: Option<PathBuf>, accept_defaults: bool) -> Result<()> {
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if accept_defaults {
        if default_config_path.exists() {
            anyhow::bail!(
                "Config already exists at {}. Remove it or run init without --yes.",
                default_config_path.display()
            );
        }
        write_config(&default_config_path, &Config::default())?;
        println!("Config written to {}", default_config_path.display());
        return Ok(());
    }

    println!();
    println!("nirf-rerank configuration");
    println!("=========================");
    println!();

    let defaults = Config::default();

    // 1. Data file
    let data_path = prompt_with_default("Institution data file (CSV)", &defaults.data_path)?;

    // 2. Policy
    println!();
    println!("When you move one slider, the others can either rebalance so the five");
    println!("weights always add up to 100, or stay put (only proportions matter).");
    let keep_sum = prompt_yes_no("Keep weights summing to 100?", true)?;
    let policy = if keep_sum {
        BalancePolicy::SumPreserving
    } else {
        BalancePolicy::Unconstrained
    };

    // 3. Default weights, re-asked until they validate for the chosen policy
    println!();
    let criteria_codes = defaults
        .criteria
        .iter()
        .map(|c| c.code.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Starting weights, in order: {}", criteria_codes);
    let default_weights = loop {
        let input =
            prompt_with_default("Default weights", &format_weight_list(&defaults.default_weights))?;
        let weights = match parse_weight_list(&input) {
            Ok(w) => w,
            Err(e) => {
                println!("  Invalid: {}. Try again.", e);
                continue;
            }
        };
        let candidate = Config {
            policy,
            default_weights: weights.clone(),
            ..defaults.clone()
        };
        match validate_config(&candidate) {
            Ok(()) => break weights,
            Err(errors) => {
                for error in errors {
                    println!("  Invalid: {}", error);
                }
            }
        }
    };

    // 4. Config path
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        data_path,
        policy,
        default_weights,
        ..defaults
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `nirf-rerank` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_list_commas_and_spaces() {
        assert_eq!(
            parse_weight_list("30, 30,20 10  10").unwrap(),
            vec![30.0, 30.0, 20.0, 10.0, 10.0]
        );
    }

    #[test]
    fn test_parse_weight_list_rejects_words() {
        let err = parse_weight_list("30, lots").unwrap_err();
        assert!(err.to_string().contains("'lots'"));
    }

    #[test]
    fn test_format_weight_list() {
        assert_eq!(format_weight_list(&[30.0, 12.5]), "30, 12.5");
    }

    #[test]
    fn test_write_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            policy: BalancePolicy::Unconstrained,
            default_weights: vec![90.0, 90.0, 60.0, 30.0, 30.0],
            ..Config::default()
        };
        write_config(&path, &config).unwrap();

        let loaded = crate::config::load_config(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_accept_defaults_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "{}").unwrap();
        let err = run_init_wizard(Some(path), true).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_accept_defaults_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        run_init_wizard(Some(path.clone()), true).unwrap();
        let loaded = crate::config::load_config(Some(path)).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
