//! Redirect rule parsing, lookup, and lifecycle.

pub mod parse;
pub mod store;
pub mod table;

pub use store::{RuleStore, RulesError};
pub use table::Outcome;
