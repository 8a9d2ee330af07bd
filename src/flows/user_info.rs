//! Profile retrieval: bearer request, error-payload check, schema adaptation, projection, and
//! hosted-domain validation.
//!
//! The hosted-domain policy is enforced after projection and before the user is returned, so a
//! caller never receives a [`GoogleUser`] that violates it.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request, StatusCode,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{self, TokenSecret},
	error::{ConfigError, ProviderError, TransientError},
	flows::GoogleClient,
	http::{ProviderHttpClient, ResponseMetadataSlot},
	oauth::TransportErrorMapper,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderCall,
	user::{self, GoogleUser, IdentityClaims},
};

const BODY_PREVIEW_LIMIT: usize = 256;

impl<C, M> GoogleClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches the signed-in user's profile with `access_token`.
	pub async fn fetch_user(&self, access_token: &TokenSecret) -> Result<GoogleUser> {
		const KIND: FlowKind = FlowKind::UserInfo;

		let span = FlowSpan::new(KIND, "fetch_user");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let (status, payload) = self.request_profile(access_token).await?;

				self.user_from_response(status, payload)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Turns a profile response into a validated [`GoogleUser`].
	///
	/// Useful when the profile was fetched by other means. Error payloads are rejected before
	/// any projection happens.
	pub fn user_from_response(&self, status: u16, payload: JsonValue) -> Result<GoogleUser> {
		user::check_response(status, &payload)?;

		let JsonValue::Object(payload) = payload else {
			return Err(Error::malformed("profile payload is not a JSON object"));
		};
		let claims = self.config.profile_schema().normalize(payload);

		self.create_user(claims)
	}

	/// Projects `claims` and enforces the hosted-domain policy.
	pub fn create_user(&self, claims: IdentityClaims) -> Result<GoogleUser> {
		let user = GoogleUser::project(claims)?;

		auth::validate_hosted_domain(self.config.hosted_domain.as_ref(), user.hosted_domain())?;

		Ok(user)
	}

	async fn request_profile(&self, access_token: &TokenSecret) -> Result<(u16, JsonValue)> {
		let call = ProviderCall::UserInfo;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let request = Request::builder()
			.method(Method::GET)
			.uri(self.config.resource_owner_details_url().as_str())
			.header(AUTHORIZATION, access_token.bearer_header())
			.header(ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let response = handle.call(request).await.map_err(|e| {
			self.transport_mapper.map_transport_error(
				self.strategy.as_ref(),
				call,
				slot.take().as_ref(),
				e,
			)
		})?;
		let status = response.status();
		let body = response.body();
		let de = &mut serde_json::Deserializer::from_slice(body);
		let parsed: Result<JsonValue, _> = serde_path_to_error::deserialize(de);

		match parsed {
			Ok(payload) => Ok((status.as_u16(), payload)),
			Err(_) if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
				let meta = slot.take();

				Err(TransientError::Endpoint {
					endpoint: call.endpoint(),
					message: format!("HTTP status {}", status.as_u16()),
					status: Some(status.as_u16()),
					retry_after: meta.and_then(|meta| meta.retry_after),
				}
				.into())
			},
			Err(_) if !status.is_success() => Err(ProviderError {
				code: i64::from(status.as_u16()),
				message: format!("HTTP status {}", status.as_u16()),
				payload: JsonValue::String(body_preview(body)),
			}
			.into()),
			Err(source) => Err(TransientError::ResponseParse {
				endpoint: call.endpoint(),
				source,
				status: Some(status.as_u16()),
			}
			.into()),
		}
	}
}

fn body_preview(body: &[u8]) -> String {
	String::from_utf8_lossy(body).chars().take(BODY_PREVIEW_LIMIT).collect()
}
