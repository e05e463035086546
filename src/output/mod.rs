pub mod formatter;

pub use formatter::{
    format_json, format_ranked_table, format_row_detail, format_score, format_tsv, format_weight,
    format_weights, should_use_colors, truncate_name,
};
