use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use nirf_rerank::config::Config;
use nirf_rerank::dashboard::{Gesture, ViewModel};
use nirf_rerank::data::Institution;
use nirf_rerank::scoring::{CriteriaSet, SortSpec};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_UI: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive dashboard with weight sliders (default if no subcommand)
    Tui,
    /// Print the ranking once, after applying the given slider moves
    List {
        /// Drag a slider: CODE=VALUE (repeatable, applied in order)
        #[arg(long = "set", value_name = "CODE=VALUE")]
        set: Vec<String>,

        /// Hide a subset of institutions (repeatable)
        #[arg(long, value_name = "SUBSET")]
        hide: Vec<String>,

        /// Show a subset that starts hidden (repeatable)
        #[arg(long, value_name = "SUBSET")]
        show: Vec<String>,

        /// Sort by a column instead of score: rank, id, name, score or a criterion code
        #[arg(long, value_name = "COLUMN[:asc|desc]")]
        sort: Option<String>,

        /// Restore the default weights before applying --set
        #[arg(long)]
        reset: bool,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Only print the first N rows
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// Create a config file interactively
    Init {
        /// Write the built-in defaults without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "nirf-rerank")]
#[command(about = "Re-rank NIRF institutions with your own criterion weights", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/nirf-rerank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Institution CSV (overrides data_path from the config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let start_time = Instant::now();

    if let Err(e) = nirf_rerank::logging::init_tracing(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { yes } = command {
        if let Err(e) = nirf_rerank::config::run_init_wizard(config_path, yes) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let mut config = match nirf_rerank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    // Validate at startup, reporting every problem
    if let Err(errors) = nirf_rerank::scoring::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let institutions = match load_data(&config) {
        Ok(rows) => rows,
        Err(code) => std::process::exit(code),
    };

    let mut view_model = match ViewModel::from_config(&config, institutions) {
        Ok(vm) => vm,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    tracing::info!(
        institutions = view_model.total_institutions(),
        policy = view_model.policy().label(),
        elapsed = ?start_time.elapsed(),
        "ready"
    );

    match command {
        Commands::Tui => {
            let theme = nirf_rerank::tui::resolve_theme(config.theme);
            let app = nirf_rerank::tui::App::new(
                view_model,
                config.slider_step,
                config.reference_url.clone(),
                nirf_rerank::tui::ThemeColors::for_theme(theme),
            );
            if let Err(e) = nirf_rerank::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_UI);
            }
        }
        Commands::List {
            set,
            hide,
            show,
            sort,
            reset,
            format,
            top,
        } => {
            let steps = match list_steps(
                view_model.criteria(),
                &ListFlags {
                    set: &set,
                    hide: &hide,
                    show: &show,
                    sort: sort.as_deref(),
                    reset,
                },
            ) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("Invalid option: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            if let Err(e) = apply_list_steps(&mut view_model, steps) {
                eprintln!("Invalid option: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }

            print_list(&view_model, format, top, cli.verbose);
        }
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load the CSV named by the config, mapping failures to an exit code.
fn load_data(config: &Config) -> Result<Vec<Institution>, i32> {
    let criteria = match CriteriaSet::from_slice(&config.criteria) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };
    nirf_rerank::data::load_institutions(std::path::Path::new(&config.data_path), &criteria)
        .map_err(|e| {
            eprintln!("Data error: {}", e);
            EXIT_DATA
        })
}

struct ListFlags<'a> {
    set: &'a [String],
    hide: &'a [String],
    show: &'a [String],
    sort: Option<&'a str>,
    reset: bool,
}

/// One `list` instruction.
#[derive(Debug, Clone, PartialEq)]
enum ListStep {
    Apply(Gesture),
    /// Bring a subset to the given visibility, toggling only if it differs
    Subset { name: String, hidden: bool },
}

/// Translate `list` flags into the gestures a user would make in the TUI.
/// `--show` entries come after `--hide`, so showing wins when both name a subset.
fn list_steps(criteria: &CriteriaSet, flags: &ListFlags) -> anyhow::Result<Vec<ListStep>> {
    let mut steps = Vec::new();
    if flags.reset {
        steps.push(ListStep::Apply(Gesture::Reset));
    }
    for assignment in flags.set {
        let (code, value) = parse_assignment(assignment)?;
        let index = criteria
            .index_of(&code)
            .ok_or_else(|| anyhow::anyhow!("unknown criterion '{}'", code))?;
        steps.push(ListStep::Apply(Gesture::SliderDrag { index, value }));
    }
    for name in flags.hide {
        steps.push(ListStep::Subset {
            name: name.clone(),
            hidden: true,
        });
    }
    for name in flags.show {
        steps.push(ListStep::Subset {
            name: name.clone(),
            hidden: false,
        });
    }
    if let Some(sort) = flags.sort {
        steps.push(ListStep::Apply(Gesture::SortBy(Some(SortSpec::parse(
            sort, criteria,
        )?))));
    }
    Ok(steps)
}

/// Run `list` steps through the view model in order.
fn apply_list_steps(view_model: &mut ViewModel, steps: Vec<ListStep>) -> anyhow::Result<()> {
    for step in steps {
        let gesture = match step {
            ListStep::Apply(gesture) => gesture,
            ListStep::Subset { name, hidden } => {
                let included = view_model
                    .subsets()
                    .get(&name)
                    .map(|s| s.included)
                    .ok_or_else(|| anyhow::anyhow!("no subset named '{}'", name))?;
                if included != hidden {
                    continue;
                }
                Gesture::ToggleSubset(name)
            }
        };
        match gesture {
            Gesture::SliderDrag { index, value } => view_model.drag_slider(index, value)?,
            other => view_model.handle(other)?,
        };
    }
    Ok(())
}

/// Parse "CODE=VALUE".
fn parse_assignment(s: &str) -> anyhow::Result<(String, f64)> {
    let (code, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected CODE=VALUE, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("'{}' is not a number", value.trim()))?;
    Ok((code.trim().to_string(), value))
}

fn print_list(view_model: &ViewModel, format: OutputFormat, top: Option<usize>, verbose: bool) {
    let rows = view_model.rows();
    let rows = &rows[..top.unwrap_or(rows.len()).min(rows.len())];

    match format {
        OutputFormat::Table => {
            let use_colors = nirf_rerank::output::should_use_colors();
            println!(
                "{}",
                nirf_rerank::output::format_weights(
                    view_model.weights(),
                    view_model.criteria(),
                    view_model.policy()
                )
            );
            println!();
            if verbose && !rows.is_empty() {
                for row in rows {
                    println!(
                        "{}",
                        nirf_rerank::output::format_row_detail(
                            row,
                            view_model.criteria(),
                            view_model.weights(),
                            view_model.policy(),
                            use_colors
                        )
                    );
                    println!();
                }
            } else {
                println!(
                    "{}",
                    nirf_rerank::output::format_ranked_table(rows, use_colors)
                );
            }
        }
        OutputFormat::Tsv => println!("{}", nirf_rerank::output::format_tsv(rows)),
        OutputFormat::Json => match nirf_rerank::output::format_json(
            rows,
            view_model.criteria(),
            view_model.weights(),
            view_model.policy(),
        ) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("TLR=40").unwrap(), ("TLR".to_string(), 40.0));
        assert_eq!(parse_assignment(" go = 12.5 ").unwrap(), ("go".to_string(), 12.5));
        assert!(parse_assignment("TLR").is_err());
        assert!(parse_assignment("TLR=lots").is_err());
    }

    fn list_view_model() -> ViewModel {
        let institutions = vec![
            Institution {
                id: "1".to_string(),
                name: "Indian Institute of Technology Alpha".to_string(),
                subscores: [90.0; 5],
            },
            Institution {
                id: "2".to_string(),
                name: "Gamma University".to_string(),
                subscores: [50.0; 5],
            },
        ];
        ViewModel::from_config(&Config::default(), institutions).unwrap()
    }

    #[test]
    fn test_show_after_hide_wins() {
        let mut vm = list_view_model();
        let hide = vec!["IITs".to_string()];
        let show = vec!["iits".to_string()];
        let steps = list_steps(
            vm.criteria(),
            &ListFlags {
                set: &[],
                hide: &hide,
                show: &show,
                sort: None,
                reset: false,
            },
        )
        .unwrap();
        apply_list_steps(&mut vm, steps).unwrap();
        assert!(vm.subsets().get("IITs").unwrap().included);
        assert_eq!(vm.rows().len(), 2);
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut vm = list_view_model();
        let steps = vec![
            ListStep::Subset {
                name: "IITs".to_string(),
                hidden: true,
            },
            ListStep::Subset {
                name: "IITs".to_string(),
                hidden: true,
            },
        ];
        apply_list_steps(&mut vm, steps).unwrap();
        assert!(!vm.subsets().get("IITs").unwrap().included);
        assert_eq!(vm.rows().len(), 1);
        assert_eq!(vm.rows()[0].institution.id, "2");
    }

    #[test]
    fn test_unknown_subset_step_errors() {
        let mut vm = list_view_model();
        let steps = vec![ListStep::Subset {
            name: "Nope".to_string(),
            hidden: false,
        }];
        let err = apply_list_steps(&mut vm, steps).unwrap_err();
        assert!(err.to_string().contains("no subset named 'Nope'"));
    }

    #[test]
    fn test_list_steps_order() {
        let set = vec!["rpc=50".to_string()];
        let hide = vec!["IITs".to_string()];
        let gestures = list_steps(
            &CriteriaSet::default(),
            &ListFlags {
                set: &set,
                hide: &hide,
                show: &[],
                sort: Some("name:desc"),
                reset: true,
            },
        )
        .unwrap();

        assert_eq!(gestures.len(), 4);
        assert_eq!(gestures[0], ListStep::Apply(Gesture::Reset));
        assert_eq!(
            gestures[1],
            ListStep::Apply(Gesture::SliderDrag { index: 1, value: 50.0 })
        );
        assert_eq!(
            gestures[2],
            ListStep::Subset {
                name: "IITs".to_string(),
                hidden: true
            }
        );
        assert!(matches!(gestures[3], ListStep::Apply(Gesture::SortBy(Some(_)))));
    }

    #[test]
    fn test_list_steps_unknown_code() {
        let set = vec!["XYZ=5".to_string()];
        let err = list_steps(
            &CriteriaSet::default(),
            &ListFlags {
                set: &set,
                hide: &[],
                show: &[],
                sort: None,
                reset: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown criterion"));
    }

    #[test]
    fn test_cli_parses_list_flags() {
        let cli = Cli::try_parse_from([
            "nirf-rerank",
            "--data",
            "rows.csv",
            "list",
            "--set",
            "TLR=40",
            "--set",
            "GO=5",
            "--format",
            "json",
            "--top",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.data.as_deref(), Some("rows.csv"));
        match cli.command {
            Some(Commands::List { set, format, top, .. }) => {
                assert_eq!(set, vec!["TLR=40", "GO=5"]);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(top, Some(10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
