//! Authorization code exchange and refresh grants.
//!
//! Both grants go through `oauth2::basic::BasicClient`; failures are classified by the
//! configured [`ProviderStrategy`](crate::provider::ProviderStrategy). The client does not store
//! the resulting [`TokenGrant`].

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret},
	flows::{AuthorizationSession, GoogleClient},
	http::ProviderHttpClient,
	oauth::{OAuth2Facade, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C, M> GoogleClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges an authorization code for tokens.
	///
	/// Pass the session's PKCE verifier when the redirect carried a challenge.
	pub async fn exchange_code(
		&self,
		code: &str,
		pkce_verifier: Option<&str>,
	) -> Result<TokenGrant> {
		const KIND: FlowKind = FlowKind::CodeExchange;

		let span = FlowSpan::new(KIND, "exchange_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let requested = self.requested_scopes();
				let facade = self.facade()?;

				facade
					.exchange_authorization_code(
						self.strategy.as_ref(),
						code,
						pkce_verifier,
						&requested,
					)
					.await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Validates the callback `state` against `session`, then exchanges `code`.
	pub async fn complete_authorization(
		&self,
		session: &AuthorizationSession,
		returned_state: &str,
		code: &str,
	) -> Result<TokenGrant> {
		if let Err(e) = session.validate_state(returned_state) {
			obs::record_flow_outcome(FlowKind::CodeExchange, FlowOutcome::Failure);

			return Err(e);
		}

		self.exchange_code(code, session.pkce_verifier()).await
	}

	/// Obtains a new access token with a refresh token.
	///
	/// When Google does not rotate the refresh token, the returned grant carries the one passed
	/// in.
	pub async fn refresh_access_token(&self, refresh_token: &TokenSecret) -> Result<TokenGrant> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let requested = self.requested_scopes();
				let facade = self.facade()?;

				facade.refresh_token(self.strategy.as_ref(), refresh_token, &requested).await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
