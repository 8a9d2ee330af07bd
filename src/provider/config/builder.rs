// std
use std::iter::IntoIterator;
// self
use crate::{
	_prelude::*,
	auth::{DomainPolicy, ScopeList, ScopeValidationError},
	provider::{ApiVersion, GoogleConfig, ProviderEndpoints},
};

/// Errors raised while constructing or validating a configuration.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum GoogleConfigError {
	/// Client identifier is mandatory.
	#[error("Client identifier cannot be empty.")]
	MissingClientId,
	/// Redirect URI is mandatory for the authorization code flow.
	#[error("Missing redirect URI.")]
	MissingRedirectUri,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Built-in endpoint could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A configured scope is empty or contains whitespace.
	#[error(transparent)]
	InvalidScope(#[from] ScopeValidationError),
}

/// Builder for [`GoogleConfig`] values.
#[derive(Debug)]
pub struct GoogleConfigBuilder {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional client secret.
	pub client_secret: Option<String>,
	/// Redirect URI registered with Google.
	pub redirect_uri: Option<Url>,
	/// Raw hosted-domain policy string.
	pub hosted_domain: Option<String>,
	/// Raw `access_type` value.
	pub access_type: Option<String>,
	/// Raw `prompt` value.
	pub prompt: Option<String>,
	/// Extra scopes, validated at build time.
	pub scopes: Vec<String>,
	/// API generation; decides default endpoints.
	pub api_version: ApiVersion,
	/// Authorization endpoint override.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// Profile endpoint override.
	pub userinfo_endpoint: Option<Url>,
	/// Whether to send a PKCE challenge.
	pub pkce_required: bool,
	/// Extra Google+ profile fields.
	pub user_fields: Vec<String>,
}
impl GoogleConfigBuilder {
	/// Creates a new builder seeded with the provided client identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			redirect_uri: None,
			hosted_domain: None,
			access_type: None,
			prompt: None,
			scopes: Vec::new(),
			api_version: ApiVersion::default(),
			authorization_endpoint: None,
			token_endpoint: None,
			userinfo_endpoint: None,
			pkce_required: false,
			user_fields: Vec::new(),
		}
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Sets the hosted-domain policy (single domain, list, `*`, or expressions).
	pub fn hosted_domain(mut self, policy: impl Into<String>) -> Self {
		self.hosted_domain = Some(policy.into());

		self
	}

	/// Sets the default `access_type`.
	pub fn access_type(mut self, access_type: impl Into<String>) -> Self {
		self.access_type = Some(access_type.into());

		self
	}

	/// Sets the default `prompt`.
	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());

		self
	}

	/// Adds a single extra scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.push(scope.into());

		self
	}

	/// Adds multiple extra scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Selects the API generation.
	pub fn api_version(mut self, version: ApiVersion) -> Self {
		self.api_version = version;

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the profile endpoint.
	pub fn userinfo_endpoint(mut self, url: Url) -> Self {
		self.userinfo_endpoint = Some(url);

		self
	}

	/// Requires an S256 PKCE challenge on authorization requests.
	pub fn pkce_required(mut self, required: bool) -> Self {
		self.pkce_required = required;

		self
	}

	/// Adds Google+ profile fields to request.
	pub fn user_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.user_fields.extend(fields.into_iter().map(Into::into));

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<GoogleConfig, GoogleConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(GoogleConfigError::MissingClientId);
		}

		let redirect_uri = self.redirect_uri.ok_or(GoogleConfigError::MissingRedirectUri)?;
		let version = self.api_version;
		let endpoints = ProviderEndpoints {
			authorization: resolve_endpoint(
				"authorization",
				self.authorization_endpoint,
				version.authorization_url(),
			)?,
			token: resolve_endpoint("token", self.token_endpoint, version.token_url())?,
			userinfo: resolve_endpoint("userinfo", self.userinfo_endpoint, version.userinfo_url())?,
		};
		let scopes = ScopeList::new(self.scopes)?;

		Ok(GoogleConfig {
			client_id: self.client_id,
			client_secret: non_empty(self.client_secret),
			redirect_uri,
			hosted_domain: non_empty(self.hosted_domain).map(DomainPolicy::parse),
			access_type: non_empty(self.access_type),
			prompt: non_empty(self.prompt),
			scopes,
			api_version: version,
			endpoints,
			pkce_required: self.pkce_required,
			user_fields: self.user_fields.into_iter().filter(|field| !field.is_empty()).collect(),
		})
	}
}

fn resolve_endpoint(
	name: &'static str,
	custom: Option<Url>,
	default: &'static str,
) -> Result<Url, GoogleConfigError> {
	let url = match custom {
		Some(url) => url,
		None => Url::parse(default).map_err(|_| GoogleConfigError::InvalidEndpoint {
			endpoint: name,
			url: default.to_owned(),
		})?,
	};

	if url.scheme() != "https" {
		return Err(GoogleConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() });
	}

	Ok(url)
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}
