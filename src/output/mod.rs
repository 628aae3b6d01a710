pub mod formatter;

pub use formatter::{
    format_delta, format_explanation, format_heat, format_score, should_use_colors,
};
