//! Authorization redirect assembly.
//!
//! [`AuthorizationParameters::build`] merges per-call [`AuthorizationOptions`] with the
//! configuration: the `hd` hint (single literal policies only), `access_type`, `prompt`, and the
//! `openid email profile` scope list extended with configured and per-call scopes.
//! [`GoogleClient::start_authorization`] lets the provider strategy adjust the result and turns
//! it into an [`AuthorizationSession`].

mod params;
mod session;

pub use params::*;
pub use session::*;

// self
use crate::{
	flows::GoogleClient,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C, M> GoogleClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the final authorization parameters, including strategy adjustments.
	pub fn authorization_parameters(
		&self,
		options: &AuthorizationOptions,
	) -> AuthorizationParameters {
		let mut params = AuthorizationParameters::build(&self.config, options);

		self.strategy.augment_authorization(&mut params);
		params.enforce_prompt_exclusion();

		params
	}

	/// Creates the redirect URL, `state`, and optional PKCE verifier for a sign-in attempt.
	pub fn start_authorization(&self, options: &AuthorizationOptions) -> AuthorizationSession {
		const KIND: FlowKind = FlowKind::Authorization;

		let span = FlowSpan::new(KIND, "start_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let session = span.in_scope(|| {
			AuthorizationSession::new(&self.config, self.authorization_parameters(options))
		});

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		session
	}
}
