use crate::config::parser::parse_config_file;
use crate::config::types::{Config, LoadedConfig, Overrides, Settings};
use crate::error::{ExportError, Result};
use std::path::{Path, PathBuf};

/// File name of the user config in the home directory.
pub const USER_CONFIG_FILE: &str = ".pass-to-csv.toml";

/// Environment variable that, if truthy, skips the user config lookup.
pub const NO_USER_CONFIG_ENV: &str = "PASS_TO_CSV_NO_USER_CONFIG";

/// Find and load the config file for this run.
///
/// An explicit path must exist. Without one, `~/.pass-to-csv.toml` is used
/// when present, unless `PASS_TO_CSV_NO_USER_CONFIG` is truthy.
pub fn discover_config(explicit: Option<&Path>) -> Result<Option<LoadedConfig>> {
	if let Some(path) = explicit {
		let config = parse_config_file(path)?;
		return Ok(Some(LoadedConfig {
			config,
			path: path.to_path_buf(),
		}));
	}

	if is_env_truthy(NO_USER_CONFIG_ENV) {
		return Ok(None);
	}

	let user_config_path = user_config_path()?;
	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge the config file with command-line overrides.
///
/// Scalars given on the command line win. Prefix and username lists are
/// concatenated: file entries first, then command-line entries.
pub fn merge_settings(config: Option<&Config>, overrides: Overrides) -> Settings {
	let defaults = Settings::default();
	let file = config.cloned().unwrap_or_default();

	let mut prefixes = file.prefixes;
	prefixes.extend(overrides.prefixes);
	let mut usernames = file.usernames;
	usernames.extend(overrides.usernames);

	Settings {
		store_dir: overrides.store_dir.or(file.store_dir),
		pass_command: overrides
			.pass_command
			.or(file.pass_command)
			.unwrap_or(defaults.pass_command),
		group: overrides.group.or(file.group).unwrap_or(defaults.group),
		kind: overrides.kind.or(file.kind).unwrap_or(defaults.kind),
		prefixes,
		usernames,
		header: overrides.header || file.header.unwrap_or(defaults.header),
	}
}

/// Discover the config file, merge overrides and validate the result.
pub fn load_settings(explicit: Option<&Path>, overrides: Overrides) -> Result<Settings> {
	let loaded = discover_config(explicit)?;
	let settings = merge_settings(loaded.as_ref().map(|l| &l.config), overrides);
	settings.validate()?;
	Ok(settings)
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ExportError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(USER_CONFIG_FILE))
}
