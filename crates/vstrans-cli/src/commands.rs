//! CLI command implementations
//!
//! - `translate` resolves, translates and persists every ValueSet of a list
//! - `list` generates a value-set list from a folder of ValueSet files

pub mod list;
pub mod translate;
