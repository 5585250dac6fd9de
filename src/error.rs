use std::path::PathBuf;

/// Library-level structured errors for pass-to-csv.
///
/// Rule evaluation itself never fails; every variant here comes from the
/// I/O around it (store traversal, secret retrieval, config, CSV output).
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
	#[error("Password storage doesn't exist: {path}")]
	StoreNotFound { path: PathBuf },

	#[error("Failed to read password storage: {path}")]
	StoreReadError {
		path: PathBuf,
		#[source]
		source: walkdir::Error,
	},

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid {kind} rule: {reason}")]
	InvalidRule { kind: String, reason: String },

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Cannot get the password for {identifier} (exit code: {exit_code})")]
	SecretRetrievalFailed { identifier: String, exit_code: i32 },

	#[error("Failed to write CSV row")]
	CsvWriteError(#[from] csv::Error),

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;
