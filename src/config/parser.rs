use crate::config::types::{Config, validate_patterns};
use crate::error::{ExportError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			ExportError::ConfigNotFound {
				path: path.to_path_buf(),
			}
		} else {
			ExportError::ConfigReadError {
				path: path.to_path_buf(),
				source,
			}
		}
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| ExportError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Rule patterns are checked here so a bad file fails before any export
	validate_patterns(&config.prefixes, &config.usernames)?;

	Ok(config)
}
