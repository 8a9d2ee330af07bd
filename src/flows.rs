//! Google sign-in flows: authorization redirect, token exchange, and profile retrieval.

pub mod authorization;
pub mod exchange;
pub mod user_info;

pub use authorization::*;

// self
use crate::{
	_prelude::*,
	auth::ScopeList,
	http::ProviderHttpClient,
	oauth::{BasicFacade, TransportErrorMapper},
	provider::{GoogleConfig, ProviderStrategy},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper, provider::GoogleStrategy};

/// Client specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestGoogleClient = GoogleClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Google OAuth 2.0 / OpenID Connect client.
///
/// Holds the immutable configuration, the transport, and the provider strategy. Every method
/// takes `&self`; the client keeps no per-user state, so one instance can serve concurrent
/// sign-ins.
#[derive(Clone)]
pub struct GoogleClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Validated provider configuration.
	pub config: GoogleConfig,
	/// Strategy that adjusts authorization parameters and classifies token errors.
	pub strategy: Arc<dyn ProviderStrategy>,
}
impl<C, M> GoogleClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: GoogleConfig,
		strategy: Arc<dyn ProviderStrategy>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			strategy,
		}
	}

	/// Scopes requested from the token endpoint: the defaults plus configured extras.
	pub fn requested_scopes(&self) -> ScopeList {
		let mut scopes = self.config.default_scopes();

		scopes.merge_lenient(self.config.scopes.iter());

		scopes
	}

	pub(crate) fn facade(&self) -> Result<BasicFacade<C, M>> {
		BasicFacade::from_config(
			&self.config,
			Arc::clone(&self.http_client),
			Arc::clone(&self.transport_mapper),
		)
	}
}
#[cfg(feature = "reqwest")]
impl GoogleClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client with the default reqwest transport and [`GoogleStrategy`].
	pub fn new(config: GoogleConfig) -> Self {
		Self::with_http_client(
			config,
			Arc::new(GoogleStrategy),
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for GoogleClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GoogleClient").field("config", &self.config).finish()
	}
}
