pub mod formatter;

pub use formatter::{
    format_average, format_breakdown, format_json, format_percentage, format_rank,
    format_session_table, format_summary, format_tsv, percentage_band, round_one_decimal,
    should_use_colors, truncate_name, Band, DISCLAIMER,
};
