// crates.io
use oauth2::{CsrfToken, PkceCodeChallenge};
// self
use crate::{
	_prelude::*, auth::TokenSecret, flows::AuthorizationParameters, provider::GoogleConfig,
};

// Owned by the redirect itself; per-call extras cannot replace them.
const RESERVED_PARAMS: [&str; 6] = [
	"response_type",
	"client_id",
	"redirect_uri",
	"state",
	"code_challenge",
	"code_challenge_method",
];

/// Authorization redirect plus the values the callback handler must verify.
///
/// Persist the session (it is serde-serializable) between the redirect and the callback.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizationSession {
	/// URL the end-user should be sent to.
	pub authorize_url: Url,
	/// Opaque `state` that must round-trip through the callback.
	pub state: String,
	/// Parameters merged into `authorize_url`.
	pub parameters: AuthorizationParameters,
	pkce: Option<PkcePair>,
}
impl AuthorizationSession {
	pub(crate) fn new(config: &GoogleConfig, mut parameters: AuthorizationParameters) -> Self {
		let state = parameters
			.remove("state")
			.unwrap_or_else(|| CsrfToken::new_random().secret().to_owned());
		let pkce = config.pkce_required.then(PkcePair::generate);
		let authorize_url = build_authorize_url(config, &parameters, &state, pkce.as_ref());

		Self { authorize_url, state, parameters, pkce }
	}

	/// S256 code challenge, when PKCE is enabled.
	pub fn code_challenge(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.challenge.as_str())
	}

	/// Secret PKCE verifier sent with the code exchange.
	pub fn pkce_verifier(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.verifier.expose())
	}

	/// Validates the `state` returned to the redirect URI.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state {
			Ok(())
		} else {
			Err(Error::InvalidGrant { reason: "Authorization state mismatch.".into() })
		}
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("authorize_url", &self.authorize_url)
			.field("state", &self.state)
			.field("parameters", &self.parameters)
			.field("code_challenge", &self.code_challenge())
			.finish()
	}
}

#[derive(Clone, Serialize, Deserialize)]
struct PkcePair {
	challenge: String,
	verifier: TokenSecret,
}
impl PkcePair {
	fn generate() -> Self {
		let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();

		Self {
			challenge: challenge.as_str().to_owned(),
			verifier: TokenSecret::new(verifier.secret().to_owned()),
		}
	}
}

fn build_authorize_url(
	config: &GoogleConfig,
	parameters: &AuthorizationParameters,
	state: &str,
	pkce: Option<&PkcePair>,
) -> Url {
	let mut url = config.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", config.redirect_uri.as_str());
	pairs.append_pair("state", state);

	for (key, value) in parameters.iter().filter(|(key, _)| !RESERVED_PARAMS.contains(key)) {
		pairs.append_pair(key, value);
	}

	if let Some(pkce) = pkce {
		pairs.append_pair("code_challenge", &pkce.challenge);
		pairs.append_pair("code_challenge_method", "S256");
	}

	drop(pairs);

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::flows::AuthorizationOptions;

	fn config(pkce_required: bool) -> GoogleConfig {
		GoogleConfig::builder("mock_client_id")
			.redirect_uri(
				Url::parse("https://app.example.com/callback")
					.expect("Failed to parse redirect URI."),
			)
			.pkce_required(pkce_required)
			.build()
			.expect("Test configuration should build.")
	}

	fn pairs(url: &Url) -> BTreeMap<String, String> {
		url.query_pairs().into_owned().collect()
	}

	#[test]
	fn caller_state_is_used_once() {
		let config = config(false);
		let options = AuthorizationOptions::default().state("mock_state");
		let session =
			AuthorizationSession::new(&config, AuthorizationParameters::build(&config, &options));
		let states = session.authorize_url.query_pairs().filter(|(key, _)| key == "state").count();

		assert_eq!(session.state, "mock_state");
		assert_eq!(states, 1);
		assert!(session.validate_state("mock_state").is_ok());
		assert!(matches!(session.validate_state("other"), Err(Error::InvalidGrant { .. })));
		assert!(session.code_challenge().is_none());
	}

	#[test]
	fn random_state_and_pkce_challenge() {
		let config = config(true);
		let session = AuthorizationSession::new(
			&config,
			AuthorizationParameters::build(&config, &AuthorizationOptions::default()),
		);
		let pairs = pairs(&session.authorize_url);

		assert!(!session.state.is_empty());
		assert_eq!(pairs.get("state"), Some(&session.state));
		assert_eq!(pairs.get("code_challenge_method").map(String::as_str), Some("S256"));
		assert_eq!(pairs.get("code_challenge").map(String::as_str), session.code_challenge());
		assert!(session.pkce_verifier().is_some_and(|verifier| verifier.len() >= 43));
	}

	#[test]
	fn extras_cannot_replace_reserved_parameters() {
		let config = config(false);
		let options = AuthorizationOptions::default().extra("client_id", "evil");
		let session =
			AuthorizationSession::new(&config, AuthorizationParameters::build(&config, &options));

		assert_eq!(
			pairs(&session.authorize_url).get("client_id").map(String::as_str),
			Some("mock_client_id")
		);
	}

	#[test]
	fn debug_hides_the_verifier() {
		let config = config(true);
		let session = AuthorizationSession::new(
			&config,
			AuthorizationParameters::build(&config, &AuthorizationOptions::default()),
		);
		let verifier = session.pkce_verifier().expect("PKCE verifier should exist.").to_owned();

		assert!(!format!("{session:?}").contains(&verifier));
	}
}
