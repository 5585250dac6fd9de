use crate::error::{ExportError, Result};
use crate::rules::{Chain, Pipeline, Preparer};
use serde::Deserialize;
use std::path::PathBuf;

/// Default group label for entries no prefix rule classifies.
pub const DEFAULT_GROUP: &str = "General";

/// Default entry type label.
pub const DEFAULT_KIND: &str = "Pass";

/// Default secret retrieval command.
pub const DEFAULT_PASS_COMMAND: &str = "pass";

/// Top-level configuration from a `.pass-to-csv.toml` file.
///
/// Every key is optional; unset keys fall back to command-line flags and
/// then to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// Password store directory.
	pub store_dir: Option<PathBuf>,

	/// Command used to decrypt a single entry.
	pub pass_command: Option<String>,

	/// Group label used when no prefix rule matches.
	pub group: Option<String>,

	/// Entry type label written to every row.
	#[serde(rename = "type")]
	pub kind: Option<String>,

	/// Leading path segments that become the group label.
	#[serde(default)]
	pub prefixes: Vec<String>,

	/// Substrings marking the last path segment as a username.
	#[serde(default)]
	pub usernames: Vec<String>,

	/// Emit a header row before the entries.
	pub header: Option<bool>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Values given on the command line. They take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub store_dir: Option<PathBuf>,
	pub pass_command: Option<String>,
	pub group: Option<String>,
	pub kind: Option<String>,
	pub prefixes: Vec<String>,
	pub usernames: Vec<String>,
	pub header: bool,
}

/// Fully resolved settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	/// Store directory from flag or config, before env/home fallback.
	pub store_dir: Option<PathBuf>,
	pub pass_command: String,
	pub group: String,
	pub kind: String,
	pub prefixes: Vec<String>,
	pub usernames: Vec<String>,
	pub header: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			store_dir: None,
			pass_command: DEFAULT_PASS_COMMAND.to_string(),
			group: DEFAULT_GROUP.to_string(),
			kind: DEFAULT_KIND.to_string(),
			prefixes: Vec::new(),
			usernames: Vec::new(),
			header: false,
		}
	}
}

impl Settings {
	/// Reject rule patterns that cannot be meant: an empty prefix or
	/// username, or a prefix spanning more than one path segment.
	pub fn validate(&self) -> Result<()> {
		validate_patterns(&self.prefixes, &self.usernames)
	}

	/// Build the entry-to-record pipeline these settings describe.
	pub fn pipeline(&self) -> Pipeline {
		let chain = Chain::builder()
			.prefixes(&self.prefixes)
			.usernames(&self.usernames)
			.build();
		Pipeline::new(Preparer::new(&self.group, &self.kind), chain)
	}
}

/// Check prefix and username patterns before they reach the chain.
pub fn validate_patterns(prefixes: &[String], usernames: &[String]) -> Result<()> {
	for prefix in prefixes {
		if prefix.is_empty() {
			return Err(invalid_rule("prefix", "pattern must not be empty".to_string()));
		}
		if prefix.contains('/') {
			return Err(invalid_rule(
				"prefix",
				format!("'{prefix}' spans more than one path segment"),
			));
		}
	}
	if usernames.iter().any(String::is_empty) {
		return Err(invalid_rule("username", "pattern must not be empty".to_string()));
	}
	Ok(())
}

fn invalid_rule(kind: &str, reason: String) -> ExportError {
	ExportError::InvalidRule {
		kind: kind.to_string(),
		reason,
	}
}
