//! Secret retrieval for pass-to-csv.
//!
//! This module handles:
//! - Resolving the external `pass` binary
//! - Running it once per entry and capturing the decrypted output

use crate::error::{ExportError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::trace;

/// Something that can decrypt a store entry by identifier.
pub trait SecretSource {
	fn fetch(&self, identifier: &str) -> Result<String>;
}

/// Retrieves secrets by running `<binary> <name>` (the `pass` CLI).
#[derive(Debug, Clone)]
pub struct PassCommand {
	binary: PathBuf,
	store_dir: Option<PathBuf>,
}

impl PassCommand {
	/// Resolve `command` on PATH (or as an absolute path).
	pub fn new(command: &str) -> Result<Self> {
		let binary = resolve_command(command).ok_or_else(|| ExportError::CommandNotFound {
			command: command.to_string(),
		})?;
		Ok(PassCommand {
			binary,
			store_dir: None,
		})
	}

	/// Export `PASSWORD_STORE_DIR` to the child so it reads the same store
	/// that was traversed.
	pub fn with_store_dir(mut self, store_dir: &Path) -> Self {
		self.store_dir = Some(store_dir.to_path_buf());
		self
	}

	pub fn binary(&self) -> &Path {
		&self.binary
	}
}

impl SecretSource for PassCommand {
	fn fetch(&self, identifier: &str) -> Result<String> {
		let name = identifier.strip_prefix('/').unwrap_or(identifier);
		trace!(binary = %self.binary.display(), name, "retrieving secret");

		let mut cmd = Command::new(&self.binary);
		cmd.arg(name)
			.stdin(Stdio::inherit())
			.stdout(Stdio::piped())
			.stderr(Stdio::inherit());
		if let Some(ref dir) = self.store_dir {
			cmd.env("PASSWORD_STORE_DIR", dir);
		}

		let output = cmd.output().map_err(|source| {
			if source.kind() == std::io::ErrorKind::NotFound {
				ExportError::CommandNotFound {
					command: self.binary.to_string_lossy().to_string(),
				}
			} else {
				ExportError::CommandFailed {
					command: self.binary.to_string_lossy().to_string(),
					source,
				}
			}
		})?;

		if !output.status.success() {
			return Err(ExportError::SecretRetrievalFailed {
				identifier: identifier.to_string(),
				exit_code: output.status.code().unwrap_or(-1),
			});
		}

		Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
	}
}

/// Resolve a command name to its full path.
///
/// If the command contains a path separator it is used as-is when it
/// exists. Otherwise, searches PATH for the command.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.components().count() > 1 || path.is_absolute() {
		return path.exists().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|full_path| full_path.is_file())
}
