//! Access-token values returned by Google's token endpoint.

// self
use crate::{_prelude::*, auth::ScopeList};

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value for bearer requests.
	pub fn bearer_header(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Tokens issued by a code exchange or refresh.
///
/// The crate does not persist grants; callers own storage and rotation.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Access token used as the bearer credential for profile requests.
	pub access_token: TokenSecret,
	/// Refresh token, issued when `access_type=offline` was requested.
	pub refresh_token: Option<TokenSecret>,
	/// Scopes reported by Google, or the requested scopes when the response omits them.
	pub scope: ScopeList,
	/// Instant the grant was received.
	pub issued_at: OffsetDateTime,
	/// Instant the access token stops being valid.
	pub expires_at: OffsetDateTime,
}
impl TokenGrant {
	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the access token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Time left before expiry at `instant`, clamped to zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.bearer_header(), "Bearer super-secret");
	}

	#[test]
	fn grant_expiry_helpers() {
		let grant = TokenGrant {
			access_token: TokenSecret::new("access"),
			refresh_token: Some(TokenSecret::new("refresh")),
			scope: ScopeList::openid_defaults(),
			issued_at: macros::datetime!(2025-01-01 00:00 UTC),
			expires_at: macros::datetime!(2025-01-01 01:00 UTC),
		};

		assert!(!grant.is_expired_at(macros::datetime!(2025-01-01 00:59 UTC)));
		assert!(grant.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert_eq!(
			grant.remaining_at(macros::datetime!(2025-01-01 00:30 UTC)),
			Duration::minutes(30)
		);
		assert_eq!(grant.remaining_at(macros::datetime!(2025-01-02 00:00 UTC)), Duration::ZERO);

		let rendered = format!("{grant:?}");

		assert!(!rendered.contains("access\""));
		assert!(rendered.contains("<redacted>"));
	}
}
