//! Hosted-domain policies and the validator that enforces them on authenticated users.
//!
//! A policy is parsed once from the configured `hostedDomain` string. The string may hold a
//! single domain, a comma-separated list, the `*` wildcard, or regular-expression entries
//! (anything containing `(`, `|`, or `*` but no `/`). Only a single literal domain is ever sent
//! to Google as the `hd` hint; every other shape is enforced here after authentication.

// crates.io
use regex::Regex;
// self
use crate::{_prelude::*, error::HostedDomainError, obs};

const PATTERN_MARKERS: [char; 3] = ['(', '|', '*'];

/// One whitelist entry of a [`DomainPolicy`].
#[derive(Clone, Debug)]
pub enum DomainEntry {
	/// `*`: any hosted domain is accepted, but one must be present.
	Wildcard,
	/// Domain compared by exact string equality.
	Literal(String),
	/// Regular expression searched for in the claimed domain.
	Pattern(DomainPattern),
}
impl DomainEntry {
	/// Classifies a single trimmed entry.
	pub fn parse(entry: &str) -> Self {
		if entry == "*" {
			Self::Wildcard
		} else if is_domain_expression(entry) {
			Self::Pattern(DomainPattern::compile(entry))
		} else {
			Self::Literal(entry.to_owned())
		}
	}

	/// Returns how this entry matches `claimed`, if it does.
	///
	/// `claimed` must already be known to be non-empty.
	fn matches(&self, claimed: &str) -> Option<DomainMatch> {
		match self {
			Self::Wildcard => Some(DomainMatch::Wildcard),
			Self::Literal(domain) if domain == claimed => Some(DomainMatch::Exact),
			Self::Literal(_) => None,
			// An expression may also equal the claim verbatim.
			Self::Pattern(pattern) if pattern.source == claimed => Some(DomainMatch::Exact),
			Self::Pattern(pattern) => pattern.is_match(claimed).then_some(DomainMatch::Pattern),
		}
	}
}
impl Display for DomainEntry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Wildcard => f.write_str("*"),
			Self::Literal(domain) => f.write_str(domain),
			Self::Pattern(pattern) => f.write_str(&pattern.source),
		}
	}
}

/// Regular-expression entry; a pattern that fails to compile never matches.
#[derive(Clone, Debug)]
pub struct DomainPattern {
	source: String,
	regex: Option<Regex>,
}
impl DomainPattern {
	fn compile(source: &str) -> Self {
		let regex = match Regex::new(source) {
			Ok(regex) => Some(regex),
			Err(e) => {
				obs::report_invalid_domain_pattern(source, &e);

				None
			},
		};

		Self { source: source.to_owned(), regex }
	}

	/// The pattern as configured.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Returns false when the pattern could not be compiled.
	pub fn is_valid(&self) -> bool {
		self.regex.is_some()
	}

	/// Searches `domain` for the pattern (unanchored).
	pub fn is_match(&self, domain: &str) -> bool {
		self.regex.as_ref().is_some_and(|regex| regex.is_match(domain))
	}
}

/// How a successful validation was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainMatch {
	/// No policy (or an empty one) is configured.
	Unrestricted,
	/// A literal entry equals the claimed domain.
	Exact,
	/// The `*` entry accepted a present domain.
	Wildcard,
	/// A regular-expression entry matched.
	Pattern,
}
impl DomainMatch {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DomainMatch::Unrestricted => "unrestricted",
			DomainMatch::Exact => "exact",
			DomainMatch::Wildcard => "wildcard",
			DomainMatch::Pattern => "pattern",
		}
	}
}
impl Display for DomainMatch {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Parsed hosted-domain whitelist.
#[derive(Clone)]
pub struct DomainPolicy {
	raw: String,
	entries: Vec<DomainEntry>,
}
impl DomainPolicy {
	/// Parses the configured policy string. Blank entries are dropped; parsing never fails.
	pub fn parse(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let entries = raw
			.split(',')
			.map(str::trim)
			.filter(|entry| !entry.is_empty())
			.map(DomainEntry::parse)
			.collect();

		Self { raw, entries }
	}

	/// The policy string exactly as configured.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Whitelist entries in configured order.
	pub fn entries(&self) -> &[DomainEntry] {
		&self.entries
	}

	/// True when the policy lists several domains or uses an expression.
	///
	/// Such policies cannot be expressed by Google's `hd` hint.
	pub fn is_multiple(&self) -> bool {
		self.raw.contains(',') || is_domain_expression(&self.raw)
	}

	/// Value for the `hd` authorization hint, when the policy is a single literal domain.
	///
	/// Trimmed the same way as the whitelist entries, so the hint equals the domain the
	/// validator accepts.
	pub fn hint(&self) -> Option<&str> {
		let domain = self.raw.trim();

		if domain.is_empty() || self.is_multiple() { None } else { Some(domain) }
	}

	/// Checks `claimed` against the whitelist.
	pub fn check(&self, claimed: Option<&str>) -> Result<DomainMatch, HostedDomainError> {
		if self.entries.is_empty() {
			return Ok(DomainMatch::Unrestricted);
		}

		let mismatch = || HostedDomainError {
			configured: self.raw.clone(),
			claimed: claimed.map(str::to_owned),
		};
		let claimed = claimed.filter(|domain| !domain.is_empty()).ok_or_else(mismatch)?;

		self.entries.iter().find_map(|entry| entry.matches(claimed)).ok_or_else(mismatch)
	}
}
impl PartialEq for DomainPolicy {
	fn eq(&self, other: &Self) -> bool {
		self.raw == other.raw
	}
}
impl Eq for DomainPolicy {}
impl Debug for DomainPolicy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("DomainPolicy").field(&self.raw).finish()
	}
}
impl Display for DomainPolicy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.raw)
	}
}
impl From<&str> for DomainPolicy {
	fn from(value: &str) -> Self {
		Self::parse(value)
	}
}

/// Validates a claimed hosted domain against an optional policy.
///
/// With no policy every claim passes, including a missing one. The verdict is reported to the
/// observability layer before it is returned.
pub fn validate_hosted_domain(
	policy: Option<&DomainPolicy>,
	claimed: Option<&str>,
) -> Result<DomainMatch, HostedDomainError> {
	let verdict = match policy {
		None => Ok(DomainMatch::Unrestricted),
		Some(policy) => policy.check(claimed),
	};

	obs::record_domain_check(&verdict);

	verdict
}

/// True for strings holding a domain expression: one of `(`, `|`, `*` and no `/`.
pub fn is_domain_expression(value: &str) -> bool {
	value.contains(PATTERN_MARKERS) && !value.contains('/')
}
