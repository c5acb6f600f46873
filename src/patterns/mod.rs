//! Pattern definitions, catalogs and the coin-sequence matcher

pub mod catalog;
pub mod loader;
pub mod matcher;
pub mod pattern;

pub use catalog::{validate_patterns, DefaultStacking, EffectCatalog, PatternCatalog, PatternTable};
pub use loader::{load_pattern_table, parse_pattern_table};
pub use matcher::{determine, is_satisfied, locate_indices, longest_run};
pub use pattern::{Pattern, PatternShape, StatusEffectSpec, MAX_RUN_LENGTH, MIN_RUN_LENGTH};
