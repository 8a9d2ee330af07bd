//! Immutable Google client configuration and the helpers that assemble it.
//!
//! [`GoogleConfig`] is validated once by [`GoogleConfigBuilder::build`] (or
//! [`GoogleConfig::from_json_str`]) and never mutated afterwards. Optional values given as empty
//! strings are normalized to "not set" at construction so the flows can rely on `Option`.

/// Builder API for assembling Google configurations.
pub mod builder;
/// Serde surface for reading configurations from JSON documents.
pub mod settings;

pub use builder::*;
pub use settings::*;

// self
use crate::{
	_prelude::*,
	auth::{DomainPolicy, ScopeList},
	error::ConfigError,
	provider::{ApiVersion, ProviderEndpoints},
	user::ProfileSchema,
};

/// Profile fields always requested from the Google+ `people/me` resource.
pub const PLUS_DEFAULT_FIELDS: [&str; 7] = [
	"id",
	"name(familyName,givenName)",
	"displayName",
	"emails/value",
	"image/url",
	"domain",
	"language",
];

/// Validated provider configuration consumed by the flows.
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential web clients.
	pub client_secret: Option<String>,
	/// Redirect URI registered with Google.
	pub redirect_uri: Url,
	/// Hosted-domain policy enforced on authenticated users.
	pub hosted_domain: Option<DomainPolicy>,
	/// Value for the `access_type` parameter (`online` or `offline`).
	pub access_type: Option<String>,
	/// Value for the `prompt` parameter (`none`, `consent`, `select_account`).
	pub prompt: Option<String>,
	/// Scopes requested on top of the OpenID Connect defaults.
	pub scopes: ScopeList,
	/// API generation that decides endpoints and the profile schema.
	pub api_version: ApiVersion,
	/// Resolved endpoint set.
	pub endpoints: ProviderEndpoints,
	/// Attach an S256 PKCE challenge to every authorization request.
	pub pkce_required: bool,
	/// Extra Google+ profile fields requested alongside [`PLUS_DEFAULT_FIELDS`].
	pub user_fields: Vec<String>,
}
impl GoogleConfig {
	/// Creates a new builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> GoogleConfigBuilder {
		GoogleConfigBuilder::new(client_id)
	}

	/// Reads and validates a JSON settings document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(json);
		let settings: GoogleSettings = serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::Settings { source })?;

		settings.into_config()
	}

	/// Scopes every authorization request starts from.
	pub fn default_scopes(&self) -> ScopeList {
		ScopeList::openid_defaults()
	}

	/// Schema used to read profile payloads.
	pub fn profile_schema(&self) -> ProfileSchema {
		self.api_version.schema()
	}

	/// Profile endpoint URL including any field selectors the schema needs.
	pub fn resource_owner_details_url(&self) -> Url {
		let mut url = self.endpoints.userinfo.clone();

		if matches!(self.profile_schema(), ProfileSchema::PlusPeople) {
			let fields = PLUS_DEFAULT_FIELDS
				.iter()
				.copied()
				.chain(self.user_fields.iter().map(String::as_str))
				.collect::<Vec<_>>()
				.join(",");

			url.query_pairs_mut().append_pair("fields", &fields).append_pair("alt", "json");
		}

		url
	}
}
impl Debug for GoogleConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GoogleConfig")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("hosted_domain", &self.hosted_domain)
			.field("access_type", &self.access_type)
			.field("prompt", &self.prompt)
			.field("scopes", &self.scopes)
			.field("api_version", &self.api_version)
			.field("endpoints", &self.endpoints)
			.field("pkce_required", &self.pkce_required)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn redirect() -> Url {
		Url::parse("https://app.example.com/callback").expect("Failed to parse redirect URI.")
	}

	#[test]
	fn plus_profile_url_requests_fields() {
		let config = GoogleConfig::builder("client")
			.redirect_uri(redirect())
			.api_version(ApiVersion::PlusPeople)
			.user_fields(["gender"])
			.build()
			.expect("Google+ configuration should build.");
		let url = config.resource_owner_details_url();
		let pairs: BTreeMap<_, _> = url.query_pairs().into_owned().collect();

		assert_eq!(url.path(), "/plus/v1/people/me");
		assert_eq!(pairs.get("alt").map(String::as_str), Some("json"));
		assert!(
			pairs
				.get("fields")
				.is_some_and(|fields| fields.starts_with("id,") && fields.ends_with(",gender"))
		);
	}

	#[test]
	fn openid_profile_url_has_no_query() {
		let config = GoogleConfig::builder("client")
			.redirect_uri(redirect())
			.build()
			.expect("Default configuration should build.");

		assert_eq!(
			config.resource_owner_details_url().as_str(),
			"https://openidconnect.googleapis.com/v1/userinfo"
		);
	}

	#[test]
	fn debug_hides_client_secret() {
		let config = GoogleConfig::builder("client")
			.client_secret("very-secret")
			.redirect_uri(redirect())
			.build()
			.expect("Configuration with secret should build.");
		let rendered = format!("{config:?}");

		assert!(!rendered.contains("very-secret"));
		assert!(rendered.contains("client_secret_set: true"));
	}
}
