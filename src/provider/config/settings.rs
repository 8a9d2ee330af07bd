// self
use crate::{
	_prelude::*,
	error::ConfigError,
	provider::{ApiVersion, GoogleConfig},
};

/// JSON-friendly configuration document.
///
/// Keys use camelCase (`clientId`, `hostedDomain`, `accessType`, ...). `useOidcMode` selects
/// [`ApiVersion::LegacyUserInfo`] when `apiVersion` is absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GoogleSettings {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional client secret.
	#[serde(default)]
	pub client_secret: Option<String>,
	/// Redirect URI registered with Google.
	pub redirect_uri: String,
	/// Hosted-domain policy string.
	#[serde(default)]
	pub hosted_domain: Option<String>,
	/// Default `access_type`.
	#[serde(default)]
	pub access_type: Option<String>,
	/// Default `prompt`.
	#[serde(default)]
	pub prompt: Option<String>,
	/// Extra scopes.
	#[serde(default)]
	pub scopes: Vec<String>,
	/// Explicit API generation.
	#[serde(default)]
	pub api_version: Option<ApiVersion>,
	/// Shorthand for the `oauth2/v3/userinfo` generation.
	#[serde(default)]
	pub use_oidc_mode: bool,
	/// Whether to send a PKCE challenge.
	#[serde(default)]
	pub pkce_required: bool,
	/// Extra Google+ profile fields.
	#[serde(default)]
	pub user_fields: Vec<String>,
}
impl GoogleSettings {
	/// Validates the settings into an immutable [`GoogleConfig`].
	pub fn into_config(self) -> Result<GoogleConfig, ConfigError> {
		let redirect_uri = Url::parse(&self.redirect_uri)
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let api_version = self.api_version.unwrap_or(if self.use_oidc_mode {
			ApiVersion::LegacyUserInfo
		} else {
			ApiVersion::OpenIdConnect
		});
		let mut builder = GoogleConfig::builder(self.client_id)
			.redirect_uri(redirect_uri)
			.scopes(self.scopes)
			.api_version(api_version)
			.pkce_required(self.pkce_required)
			.user_fields(self.user_fields);

		if let Some(secret) = self.client_secret {
			builder = builder.client_secret(secret);
		}
		if let Some(policy) = self.hosted_domain {
			builder = builder.hosted_domain(policy);
		}
		if let Some(access_type) = self.access_type {
			builder = builder.access_type(access_type);
		}
		if let Some(prompt) = self.prompt {
			builder = builder.prompt(prompt);
		}

		Ok(builder.build()?)
	}
}
