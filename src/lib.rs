//! Google sign-in on top of Rust's `oauth2` stack: authorization URLs that know about scopes,
//! prompts, and hosted-domain hints, plus typed OpenID Connect profiles that are checked against
//! an organization's hosted-domain policy before they reach the caller.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod user;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		flows::GoogleClient,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{GoogleConfig, GoogleConfigBuilder, GoogleStrategy, ProviderStrategy},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = GoogleClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Seeds a configuration builder with test credentials and a fixed redirect URI.
	pub fn test_config_builder() -> GoogleConfigBuilder {
		GoogleConfig::builder("mock_client_id").client_secret("mock_secret").redirect_uri(
			Url::parse("https://app.example.com/oauth/callback")
				.expect("Redirect URI fixture should parse successfully."),
		)
	}

	/// Constructs a [`GoogleClient`] backed by the default Google strategy and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_client(config: GoogleConfig) -> ReqwestTestClient {
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(GoogleStrategy);
		let http_client = test_reqwest_http_client();
		let mapper = Arc::new(ReqwestTransportErrorMapper);

		GoogleClient::with_http_client(config, strategy, http_client, mapper)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
