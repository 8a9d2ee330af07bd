//! Provider strategy hooks consulted by the flows.
//!
//! A strategy can decorate the authorization parameters right before the redirect URL is
//! assembled and classifies token endpoint failures into the crate's error taxonomy, without
//! tying either concern to a particular HTTP client.

// self
use crate::{_prelude::*, flows::AuthorizationParameters};

/// Google endpoint interactions that can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderCall {
	/// Authorization code exchange at the token endpoint.
	AuthorizationCode,
	/// Refresh token grant at the token endpoint.
	RefreshToken,
	/// Profile request against the userinfo endpoint.
	UserInfo,
}
impl ProviderCall {
	/// Returns the RFC 6749 grant identifier, or `userinfo`.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderCall::AuthorizationCode => "authorization_code",
			ProviderCall::RefreshToken => "refresh_token",
			ProviderCall::UserInfo => "userinfo",
		}
	}

	/// Label of the endpoint the call targets.
	pub const fn endpoint(self) -> &'static str {
		match self {
			ProviderCall::AuthorizationCode | ProviderCall::RefreshToken => "token",
			ProviderCall::UserInfo => "userinfo",
		}
	}
}
impl Display for ProviderCall {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Strategy hook that lets callers decorate requests and classify errors.
///
/// Implementors must be `Send + Sync`. Only [`classify_token_error`](Self::classify_token_error)
/// is required.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a failed token request into the crate taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;

	/// Adjusts the final authorization parameters before they are encoded.
	///
	/// Runs after the built-in merge, so it can add parameters such as `login_hint`.
	fn augment_authorization(&self, _params: &mut AuthorizationParameters) {}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Google rejected the authorization grant (bad code/refresh token).
	InvalidGrant,
	/// Client authentication or client policy failed.
	InvalidClient,
	/// Requested scopes exceed what the token covers.
	InsufficientScope,
	/// Failure is temporary and should be retried.
	Transient,
}

/// Primitive facts about a failed token request handed to
/// [`ProviderStrategy::classify_token_error`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Call that failed.
	pub call: ProviderCall,
	/// HTTP status code, when available.
	pub http_status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
	/// Indicates whether the failure originated from the network/transport layer.
	pub network_error: bool,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided call.
	pub fn new(call: ProviderCall) -> Self {
		Self {
			call,
			http_status: None,
			oauth_error: None,
			error_description: None,
			body_preview: None,
			network_error: false,
		}
	}

	/// Convenience constructor for transport-level failures.
	pub fn network_failure(call: ProviderCall) -> Self {
		Self { network_error: true, ..Self::new(call) }
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a truncated body preview.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// Google's token endpoint conventions.
///
/// Structured `error` codes win, then the description and body text, and finally the HTTP
/// status. Network failures are always transient.
#[derive(Debug, Default)]
pub struct GoogleStrategy;
impl Display for GoogleStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("google-strategy")
	}
}
impl ProviderStrategy for GoogleStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.network_error {
			return ProviderErrorKind::Transient;
		}

		ctx.oauth_error
			.as_deref()
			.and_then(classify_code)
			.or_else(|| ctx.error_description.as_deref().and_then(classify_code))
			.or_else(|| ctx.error_description.as_deref().and_then(classify_text))
			.or_else(|| ctx.body_preview.as_deref().and_then(classify_text))
			.unwrap_or_else(|| classify_status(ctx.http_status))
	}
}

const ERROR_CODES: [(&str, ProviderErrorKind); 13] = [
	("invalid_grant", ProviderErrorKind::InvalidGrant),
	("access_denied", ProviderErrorKind::InvalidGrant),
	("invalid_request", ProviderErrorKind::InvalidGrant),
	("invalid_client", ProviderErrorKind::InvalidClient),
	("unauthorized_client", ProviderErrorKind::InvalidClient),
	("redirect_uri_mismatch", ProviderErrorKind::InvalidClient),
	("org_internal", ProviderErrorKind::InvalidClient),
	("admin_policy_enforced", ProviderErrorKind::InvalidClient),
	("invalid_scope", ProviderErrorKind::InsufficientScope),
	("insufficient_scope", ProviderErrorKind::InsufficientScope),
	("temporarily_unavailable", ProviderErrorKind::Transient),
	("server_error", ProviderErrorKind::Transient),
	("internal_failure", ProviderErrorKind::Transient),
];

fn classify_code(value: &str) -> Option<ProviderErrorKind> {
	ERROR_CODES.iter().find(|(code, _)| value.eq_ignore_ascii_case(code)).map(|(_, kind)| *kind)
}

fn classify_text(text: &str) -> Option<ProviderErrorKind> {
	let lowered = text.to_ascii_lowercase();

	ERROR_CODES
		.iter()
		.find(|(code, _)| lowered.contains(code))
		.map(|(_, kind)| *kind)
		.or_else(|| lowered.contains("retry").then_some(ProviderErrorKind::Transient))
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		Some(403) => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Transient,
	}
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf: String = body.chars().take(ProviderErrorContext::BODY_PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_codes_win_over_status() {
		let ctx = ProviderErrorContext::new(ProviderCall::AuthorizationCode)
			.with_http_status(401)
			.with_oauth_error("invalid_grant");

		assert_eq!(GoogleStrategy.classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx = ProviderErrorContext::new(ProviderCall::AuthorizationCode)
			.with_http_status(400)
			.with_oauth_error("admin_policy_enforced");

		assert_eq!(GoogleStrategy.classify_token_error(&ctx), ProviderErrorKind::InvalidClient);
	}

	#[test]
	fn description_and_body_fallbacks() {
		let ctx = ProviderErrorContext::new(ProviderCall::RefreshToken)
			.with_http_status(500)
			.with_error_description("Token has been expired or revoked: invalid_grant");

		assert_eq!(GoogleStrategy.classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx = ProviderErrorContext::new(ProviderCall::RefreshToken)
			.with_body_preview("Backend error, please retry");

		assert_eq!(GoogleStrategy.classify_token_error(&ctx), ProviderErrorKind::Transient);
	}

	#[test]
	fn status_and_network_fallbacks() {
		let ctx = ProviderErrorContext::new(ProviderCall::AuthorizationCode).with_http_status(403);

		assert_eq!(GoogleStrategy.classify_token_error(&ctx), ProviderErrorKind::InsufficientScope);

		let ctx = ProviderErrorContext::network_failure(ProviderCall::AuthorizationCode)
			.with_oauth_error("invalid_grant");

		assert_eq!(GoogleStrategy.classify_token_error(&ctx), ProviderErrorKind::Transient);
	}

	#[test]
	fn previews_are_truncated() {
		let ctx = ProviderErrorContext::new(ProviderCall::UserInfo).with_body_preview("x".repeat(300));
		let preview = ctx.body_preview.expect("Body preview should be recorded.");

		assert_eq!(preview.chars().count(), ProviderErrorContext::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}

	#[test]
	fn calls_expose_endpoint_labels() {
		assert_eq!(ProviderCall::AuthorizationCode.endpoint(), "token");
		assert_eq!(ProviderCall::UserInfo.endpoint(), "userinfo");
		assert_eq!(ProviderCall::RefreshToken.to_string(), "refresh_token");
	}
}
