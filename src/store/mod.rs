//! Password store traversal for pass-to-csv.
//!
//! This module handles:
//! - Locating the store directory
//! - Enumerating encrypted entries in a deterministic order
//! - Feeding each decrypted entry into a `FilteredWriter`

use crate::error::{ExportError, Result};
use crate::exec::SecretSource;
use crate::rules::Entry;
use crate::sink::{FilteredWriter, RowWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Extension of encrypted entries.
pub const ENTRY_EXTENSION: &str = "gpg";

/// Resolve the store directory.
///
/// Precedence: explicit path, then `PASSWORD_STORE_DIR`, then the config
/// value, then `~/.password-store`.
pub fn resolve_store_dir(explicit: Option<&Path>, configured: Option<&Path>) -> Result<PathBuf> {
	if let Some(path) = explicit {
		return Ok(path.to_path_buf());
	}
	if let Some(dir) = std::env::var_os("PASSWORD_STORE_DIR").filter(|v| !v.is_empty()) {
		return Ok(PathBuf::from(dir));
	}
	if let Some(path) = configured {
		return Ok(path.to_path_buf());
	}
	let home_dir = dirs::home_dir().ok_or(ExportError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(".password-store"))
}

fn is_dangling(path: &Path) -> bool {
	path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink()) && !path.exists()
}

fn is_git_dir(entry: &DirEntry) -> bool {
	entry.file_type().is_dir() && entry.file_name() == ".git"
}

/// Build the identifier for an entry file relative to the store root.
///
/// Nested entries are `dir/sub/name`; top-level entries keep a leading
/// slash (`/name`).
pub fn identifier_for(store_dir: &Path, file: &Path) -> Option<String> {
	if file.extension()? != ENTRY_EXTENSION {
		return None;
	}
	let relative = file.strip_prefix(store_dir).ok()?.with_extension("");
	let segments: Vec<_> = relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy())
		.collect();

	match segments.as_slice() {
		[] => None,
		[name] => Some(format!("/{name}")),
		_ => Some(segments.join("/")),
	}
}

/// List entry identifiers in the store, sorted by file name at each level.
/// Symlinked entries and directories are followed; `.git` directories are
/// skipped. Dangling symlinks are skipped with a warning; a symlink loop
/// is reported as a read error.
pub fn scan_store(store_dir: &Path) -> Result<Vec<String>> {
	if !store_dir.is_dir() {
		return Err(ExportError::StoreNotFound {
			path: store_dir.to_path_buf(),
		});
	}

	let mut identifiers = Vec::new();
	let walker = WalkDir::new(store_dir)
		.min_depth(1)
		.follow_links(true)
		.sort_by_file_name()
		.into_iter()
		.filter_entry(|e| !is_git_dir(e));

	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) if err.loop_ancestor().is_none() && err.path().is_some_and(is_dangling) => {
				if let Some(path) = err.path() {
					warn!(path = %path.display(), "skipping dangling symlink");
				}
				continue;
			}
			Err(source) => {
				return Err(ExportError::StoreReadError {
					path: store_dir.to_path_buf(),
					source,
				});
			}
		};

		if entry.file_type().is_dir() {
			debug!(directory = %entry.path().display(), "scanning directory");
			continue;
		}
		if !entry.file_type().is_file() {
			continue;
		}
		if let Some(identifier) = identifier_for(store_dir, entry.path()) {
			debug!(file = %entry.path().display(), %identifier, "found entry");
			identifiers.push(identifier);
		}
	}

	Ok(identifiers)
}

/// Export every entry in the store through `sink`.
///
/// Entries are processed one at a time in traversal order. The first
/// retrieval failure aborts the export. Returns the number of rows written.
pub fn export_store<S, W>(
	store_dir: &Path,
	source: &S,
	sink: &mut FilteredWriter<W>,
) -> Result<usize>
where
	S: SecretSource + ?Sized,
	W: RowWriter,
{
	let identifiers = scan_store(store_dir)?;
	let mut written = 0;

	for identifier in identifiers {
		let secret = source.fetch(&identifier)?;
		sink.write_entry(&Entry { identifier, secret })?;
		written += 1;
	}
	sink.flush()?;

	info!(entries = written, store = %store_dir.display(), "export finished");
	Ok(written)
}
