//! Crate-wide error taxonomy shared by configuration, flows, and profile validation.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The authenticated account does not satisfy the configured hosted-domain policy.
	#[error(transparent)]
	HostedDomain(#[from] HostedDomainError),
	/// Google answered with an error payload instead of a profile or token.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A well-formed response lacks data the projection requires (for example `sub`).
	#[error("Provider response is malformed: {reason}.")]
	MalformedResponse {
		/// Human-readable description of the missing or invalid data.
		reason: String,
	},
	/// Requested scopes exceed what was granted.
	#[error("Token lacks the required scopes: {reason}.")]
	InsufficientScope {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Google rejected the grant (e.g., bad code or refresh token).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
}
impl Error {
	pub(crate) fn malformed(reason: impl Into<String>) -> Self {
		Self::MalformedResponse { reason: reason.into() }
	}
}

/// Raised when the claimed hosted domain fails the configured whitelist.
///
/// Consumer accounts carry no hosted domain at all, so `claimed` is `None` for them.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error(
	"Hosted domain `{}` does not satisfy the configured policy `{configured}`.",
	.claimed.as_deref().unwrap_or("<none>")
)]
pub struct HostedDomainError {
	/// Full policy string as configured.
	pub configured: String,
	/// Hosted domain asserted for the user, if any.
	pub claimed: Option<String>,
}

/// Error payload returned by Google's token or profile endpoints.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("Provider returned an error ({code}): {message}.")]
pub struct ProviderError {
	/// Numeric error code (`error.code` or the HTTP status); zero when absent.
	pub code: i64,
	/// Error message (`error.message` or the bare `error` string).
	pub message: String,
	/// Raw response payload for diagnostics.
	pub payload: JsonValue,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Configured endpoint cannot be handed to the OAuth client.
	#[error("Configuration contains an invalid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] crate::provider::GoogleConfigError),
	/// Settings document could not be deserialized.
	#[error("Settings are invalid at `{}`.", .source.path())]
	Settings {
		/// Path-aware deserialization failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Endpoint returned an unexpected but non-fatal response.
	#[error("The {endpoint} endpoint returned an unexpected response: {message}.")]
	Endpoint {
		/// Endpoint label (`token`, `userinfo`).
		endpoint: &'static str,
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Endpoint responded with malformed JSON that could not be parsed.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Endpoint label (`token`, `userinfo`).
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling Google.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling Google.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn hosted_domain_error_renders_missing_claim() {
		let err = HostedDomainError { configured: "example.com".into(), claimed: None };

		assert_eq!(
			err.to_string(),
			"Hosted domain `<none>` does not satisfy the configured policy `example.com`."
		);

		let err = HostedDomainError {
			configured: "example.com".into(),
			claimed: Some("wrong.example.com".into()),
		};

		assert!(err.to_string().contains("`wrong.example.com`"));
	}

	#[test]
	fn provider_error_wraps_into_crate_error() {
		let err: Error = ProviderError {
			code: 400,
			message: "I am an error".into(),
			payload: JsonValue::Null,
		}
		.into();

		assert!(matches!(err, Error::Provider(ProviderError { code: 400, .. })));
		assert_eq!(err.to_string(), "Provider returned an error (400): I am an error.");
	}
}
