use crate::rules::record::Record;
use std::fmt;

/// Result of offering a record to a single rule.
///
/// A declining rule hands the record back untouched so the chain can offer
/// it to the next rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	Matched(Record),
	Declined(Record),
}

impl Outcome {
	pub fn is_matched(&self) -> bool {
		matches!(self, Outcome::Matched(_))
	}

	/// The record carried by this outcome, matched or not.
	pub fn into_record(self) -> Record {
		match self {
			Outcome::Matched(record) | Outcome::Declined(record) => record,
		}
	}
}

/// A single rewrite step operating on the unclassified title fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
	/// `/host.tld` (a leading slash and a dot in the remainder) becomes the
	/// title and the URL.
	UrlWithoutUsername,

	/// `host.tld/user` splits into title and URL `host.tld`, username `user`.
	UrlSplit,

	/// The first path segment equals the prefix: it becomes the group and
	/// is removed from the title.
	Prefix(String),

	/// The last path segment contains the substring: it becomes the
	/// username and is removed from the title.
	Username(String),

	/// `/name` with no further slash loses its leading slash.
	DropLeadingSlash,

	/// Always matches and leaves the record unchanged.
	Identity,
}

impl Rule {
	/// Apply this rule to a record, taking ownership and returning it in
	/// either outcome. `password` and `kind` are never touched.
	pub fn apply(&self, mut record: Record) -> Outcome {
		match self {
			Rule::UrlWithoutUsername => {
				let has_host = record.title.starts_with('/')
					&& record.title[1..].find('.').is_some_and(|i| i > 0);
				if !has_host {
					return Outcome::Declined(record);
				}
				record.title.remove(0);
				record.url = record.title.clone();
				Outcome::Matched(record)
			}
			Rule::UrlSplit => match record.title.find('/') {
				Some(i)
					if i > 0
						&& i + 1 < record.title.len()
						&& !record.title[i + 1..].contains('/')
						&& record.title[..i].contains('.') =>
				{
					record.username = record.title.split_off(i + 1);
					record.title.truncate(i);
					record.url = record.title.clone();
					Outcome::Matched(record)
				}
				_ => Outcome::Declined(record),
			},
			Rule::Prefix(prefix) => match record.title.find('/') {
				Some(i) if record.title[..i] == *prefix => {
					record.title.drain(..=i);
					record.group = prefix.clone();
					Outcome::Matched(record)
				}
				_ => Outcome::Declined(record),
			},
			Rule::Username(needle) => match record.title.rfind('/') {
				Some(i) if record.title[i + 1..].contains(needle.as_str()) => {
					record.username = record.title.split_off(i + 1);
					record.title.truncate(i);
					Outcome::Matched(record)
				}
				_ => Outcome::Declined(record),
			},
			Rule::DropLeadingSlash => {
				if record.title.starts_with('/') && !record.title[1..].contains('/') {
					record.title.remove(0);
					Outcome::Matched(record)
				} else {
					Outcome::Declined(record)
				}
			}
			Rule::Identity => Outcome::Matched(record),
		}
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Rule::UrlWithoutUsername => f.write_str("url-without-username"),
			Rule::UrlSplit => f.write_str("url-split"),
			Rule::Prefix(prefix) => write!(f, "prefix({prefix})"),
			Rule::Username(needle) => write!(f, "username({needle})"),
			Rule::DropLeadingSlash => f.write_str("drop-leading-slash"),
			Rule::Identity => f.write_str("identity"),
		}
	}
}
