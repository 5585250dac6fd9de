//! Record transformation for pass-to-csv.
//!
//! This module handles:
//! - Shaping a raw (identifier, secret) entry into a seven-column record
//! - The ordered rule chain that classifies the identifier into fields

pub mod chain;
pub mod record;
pub mod rule;

pub use chain::{Chain, ChainBuilder, Pipeline};
pub use record::{Entry, HEADER, Preparer, Record};
pub use rule::{Outcome, Rule};
