use crate::rules::record::{Entry, Preparer, Record};
use crate::rules::rule::{Outcome, Rule};

static IDENTITY: Rule = Rule::Identity;

/// An ordered list of rules ending in [`Rule::Identity`].
///
/// The first rule that matches wins; later rules never see the record.
#[derive(Debug, Clone)]
pub struct Chain {
	rules: Vec<Rule>,
}

impl Chain {
	/// Start building a chain. See [`ChainBuilder`] for the fixed order.
	pub fn builder() -> ChainBuilder {
		ChainBuilder::default()
	}

	/// Rules in evaluation order, terminal identity included.
	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}

	/// Run the record through the chain, returning the rewritten record and
	/// the rule that produced it.
	pub fn classify(&self, mut record: Record) -> (Record, &Rule) {
		for rule in &self.rules {
			match rule.apply(record) {
				Outcome::Matched(done) => return (done, rule),
				Outcome::Declined(back) => record = back,
			}
		}
		(record, &IDENTITY)
	}

	/// Run the record through the chain.
	pub fn run(&self, record: Record) -> Record {
		self.classify(record).0
	}
}

impl Default for Chain {
	fn default() -> Self {
		ChainBuilder::default().build()
	}
}

/// Collects user-supplied prefix and username rules.
///
/// Regardless of the order calls are made in, the built chain evaluates:
/// url-without-username, url-split, prefixes (in insertion order),
/// usernames (in insertion order), drop-leading-slash, identity.
#[derive(Debug, Clone, Default)]
pub struct ChainBuilder {
	prefixes: Vec<String>,
	usernames: Vec<String>,
}

impl ChainBuilder {
	/// Add a group prefix rule.
	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefixes.push(prefix.into());
		self
	}

	/// Add a username substring rule.
	pub fn username(mut self, needle: impl Into<String>) -> Self {
		self.usernames.push(needle.into());
		self
	}

	pub fn prefixes<I, S>(self, prefixes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		prefixes.into_iter().fold(self, |b, p| b.prefix(p))
	}

	pub fn usernames<I, S>(self, usernames: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		usernames.into_iter().fold(self, |b, u| b.username(u))
	}

	pub fn build(self) -> Chain {
		let mut rules = Vec::with_capacity(self.prefixes.len() + self.usernames.len() + 4);
		rules.push(Rule::UrlWithoutUsername);
		rules.push(Rule::UrlSplit);
		rules.extend(self.prefixes.into_iter().map(Rule::Prefix));
		rules.extend(self.usernames.into_iter().map(Rule::Username));
		rules.push(Rule::DropLeadingSlash);
		rules.push(Rule::Identity);
		Chain { rules }
	}
}

/// Preparer followed by chain: the whole entry-to-row transform.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
	pub preparer: Preparer,
	pub chain: Chain,
}

impl Pipeline {
	pub fn new(preparer: Preparer, chain: Chain) -> Self {
		Pipeline { preparer, chain }
	}

	pub fn compose(&self, entry: &Entry) -> Record {
		self.chain.run(self.preparer.prepare(entry))
	}

	/// Like [`Pipeline::compose`], also reporting the winning rule.
	pub fn classify(&self, entry: &Entry) -> (Record, &Rule) {
		self.chain.classify(self.preparer.prepare(entry))
	}
}
