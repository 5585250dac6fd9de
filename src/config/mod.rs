//! Configuration loading and parsing for pass-to-csv.
//!
//! This module handles:
//! - TOML config file parsing
//! - User config discovery
//! - Merging the file with command-line overrides

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	NO_USER_CONFIG_ENV, USER_CONFIG_FILE, discover_config, load_settings, merge_settings,
	user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, Overrides, Settings};
