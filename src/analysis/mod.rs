//! Analysis of collected facts.
//!
//! Currently this is the rule-based recommendation engine.

pub mod recommendations;

pub use recommendations::{parse_percent, recommend};
