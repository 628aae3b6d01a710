pub mod config;
pub mod document;
pub mod loader;
pub mod parser;
pub mod table;
pub mod validation;

pub use config::*;
pub use document::{rules_from_str, rules_from_tree, rules_from_value};
pub use loader::{default_candidates, load_rules_file, RulesLoader, RulesSource};
pub use parser::{parse, Node, ParseError, ParseErrorKind};
pub use table::WeightTable;
pub use validation::validate_rules;

/// The rule document shipped with the crate; encodes `RulesConfig::default()`.
pub const BUNDLED_RULES: &str = include_str!("../../config/scoring-rules.yaml");
