//! Google endpoint URLs for each supported API generation.
//!
//! The authorization endpoint is shared. Token and profile endpoints, and the shape of the
//! profile payload, depend on the [`ApiVersion`].

// self
use crate::{_prelude::*, user::ProfileSchema};

const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const LEGACY_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
const OPENID_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const LEGACY_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const PLUS_PEOPLE_URL: &str = "https://www.googleapis.com/plus/v1/people/me";

/// Google API generation the client talks to.
///
/// Each version pins a token endpoint, a profile endpoint, and the claims schema used to read
/// the profile payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiVersion {
	/// Current OpenID Connect endpoints (`openidconnect.googleapis.com/v1/userinfo`).
	#[default]
	OpenIdConnect,
	/// The `oauth2/v3/userinfo` endpoint paired with the `oauth2/v4/token` endpoint.
	LegacyUserInfo,
	/// The retired Google+ `people/me` resource.
	PlusPeople,
}
impl ApiVersion {
	/// Authorization endpoint URL.
	pub const fn authorization_url(self) -> &'static str {
		AUTHORIZATION_URL
	}

	/// Token endpoint URL.
	pub const fn token_url(self) -> &'static str {
		match self {
			ApiVersion::OpenIdConnect => TOKEN_URL,
			ApiVersion::LegacyUserInfo | ApiVersion::PlusPeople => LEGACY_TOKEN_URL,
		}
	}

	/// Profile (resource owner details) endpoint URL.
	pub const fn userinfo_url(self) -> &'static str {
		match self {
			ApiVersion::OpenIdConnect => OPENID_USERINFO_URL,
			ApiVersion::LegacyUserInfo => LEGACY_USERINFO_URL,
			ApiVersion::PlusPeople => PLUS_PEOPLE_URL,
		}
	}

	/// Claims schema of the profile payload.
	pub const fn schema(self) -> ProfileSchema {
		match self {
			ApiVersion::OpenIdConnect | ApiVersion::LegacyUserInfo => ProfileSchema::OpenIdConnect,
			ApiVersion::PlusPeople => ProfileSchema::PlusPeople,
		}
	}
}

/// Endpoint set used by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for exchanges and refreshes.
	pub token: Url,
	/// Profile endpoint queried with the access token.
	pub userinfo: Url,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn versions_pin_their_endpoints() {
		assert_eq!(
			ApiVersion::OpenIdConnect.userinfo_url(),
			"https://openidconnect.googleapis.com/v1/userinfo"
		);
		assert!(ApiVersion::OpenIdConnect.token_url().ends_with("/token"));
		assert_eq!(
			ApiVersion::LegacyUserInfo.userinfo_url(),
			"https://www.googleapis.com/oauth2/v3/userinfo"
		);
		assert!(ApiVersion::LegacyUserInfo.token_url().ends_with("/oauth2/v4/token"));
		assert_eq!(ApiVersion::PlusPeople.schema(), ProfileSchema::PlusPeople);
		assert_eq!(ApiVersion::LegacyUserInfo.schema(), ProfileSchema::OpenIdConnect);
	}

	#[test]
	fn versions_deserialize_from_kebab_case() {
		let version: ApiVersion = serde_json::from_str("\"legacy-user-info\"")
			.expect("API version should deserialize successfully.");

		assert_eq!(version, ApiVersion::LegacyUserInfo);
	}
}
