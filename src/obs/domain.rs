// crates.io
use regex::Error as RegexError;
// self
use crate::{auth::DomainMatch, error::HostedDomainError, obs};

/// Reports a hosted-domain verdict to the tracing and metrics layers.
pub fn record_domain_check(verdict: &Result<DomainMatch, HostedDomainError>) {
	match verdict {
		Ok(matched) => {
			#[cfg(feature = "tracing")]
			tracing::debug!(outcome = matched.as_str(), "Hosted domain accepted.");

			obs::record_domain_outcome(matched.as_str());
		},
		Err(e) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(
				configured = %e.configured,
				claimed = e.claimed.as_deref().unwrap_or_default(),
				"Hosted domain rejected."
			);
			#[cfg(not(feature = "tracing"))]
			let _ = e;

			obs::record_domain_outcome("mismatch");
		},
	}
}

/// Reports a hosted-domain expression that failed to compile; the entry never matches.
pub fn report_invalid_domain_pattern(pattern: &str, error: &RegexError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		pattern,
		error = %error,
		"Hosted-domain pattern is invalid and will never match."
	);

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (pattern, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reporting_is_silent_without_features() {
		record_domain_check(&Ok(DomainMatch::Exact));
		record_domain_check(&Err(HostedDomainError {
			configured: "example.com".into(),
			claimed: None,
		}));
	}
}
