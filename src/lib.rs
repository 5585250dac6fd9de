//! pass-to-csv - export a `pass` password store to CSV.
//!
//! This library provides the core functionality for pass-to-csv, including:
//! - Traversal of the password store and secret retrieval through `pass`
//! - The rule chain that turns an entry path into title, username, URL and group
//! - CSV output in the seven-column import layout
//! - Configuration file parsing and merging with command-line flags
//!
//! # Example
//!
//! ```
//! use pass_to_csv::rules::{Chain, Entry, Pipeline, Preparer};
//!
//! let chain = Chain::builder().prefix("work").build();
//! let pipeline = Pipeline::new(Preparer::new("General", "Pass"), chain);
//!
//! let record = pipeline.compose(&Entry::new("work/intranet", "hunter2"));
//! assert_eq!(record.group, "work");
//! assert_eq!(record.title, "intranet");
//! assert_eq!(record.password, "hunter2");
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod rules;
pub mod sink;
pub mod store;

pub use error::{ExportError, Result};
