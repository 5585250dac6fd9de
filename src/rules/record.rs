/// Column names in output order.
pub const HEADER: [&str; 7] = ["Title", "Username", "Password", "URL", "Notes", "Group", "Type"];

/// A raw entry read from the password store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	/// Slash-delimited path of the secret inside the store.
	pub identifier: String,

	/// Decrypted secret, passed through untouched.
	pub secret: String,
}

impl Entry {
	pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
		Entry {
			identifier: identifier.into(),
			secret: secret.into(),
		}
	}
}

/// One output row under construction.
///
/// While the chain runs, `title` holds the part of the identifier no rule
/// has classified yet. `password` and `kind` are set by [`Preparer`] only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
	pub title: String,
	pub username: String,
	pub password: String,
	pub url: String,
	pub notes: String,
	pub group: String,
	pub kind: String,
}

impl Record {
	/// Fields in CSV column order.
	pub fn to_row(&self) -> [&str; 7] {
		[
			&self.title,
			&self.username,
			&self.password,
			&self.url,
			&self.notes,
			&self.group,
			&self.kind,
		]
	}
}

/// Seeds an [`Entry`] into the initial record shape.
#[derive(Debug, Clone, Default)]
pub struct Preparer {
	/// Group label used when no rule assigns one.
	pub group: String,

	/// Entry type label written to every row.
	pub kind: String,
}

impl Preparer {
	pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
		Preparer {
			group: group.into(),
			kind: kind.into(),
		}
	}

	/// Produce `[identifier, "", secret, "", "", group, kind]`.
	pub fn prepare(&self, entry: &Entry) -> Record {
		Record {
			title: entry.identifier.clone(),
			password: entry.secret.clone(),
			group: self.group.clone(),
			kind: self.kind.clone(),
			..Default::default()
		}
	}
}
