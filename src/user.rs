//! Google account profiles projected from raw identity claims.
//!
//! [`IdentityClaims`] is the OpenID Connect claims object returned by the profile endpoint (or
//! produced by a [`ProfileSchema`] adapter for older API generations). [`GoogleUser`] is a
//! read-only view over those claims; accessors never mutate or cache anything beyond the wrapped
//! map, and [`GoogleUser::to_claims`] hands back exactly the keys that were projected.

pub mod schema;

pub use schema::*;

// self
use crate::_prelude::*;

const GMAIL_SUFFIX: &str = "@gmail.com";

/// Raw claims mapping about the authenticated identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityClaims(JsonMap<String, JsonValue>);
impl IdentityClaims {
	/// Wraps an existing claims map.
	pub fn new(claims: JsonMap<String, JsonValue>) -> Self {
		Self(claims)
	}

	/// Returns the raw value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key)
	}

	/// Returns the claim as a string slice when it holds a JSON string.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(JsonValue::as_str)
	}

	/// Returns `true` when the claim is present (even if `null`).
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Number of claims.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no claims are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Borrows the underlying map.
	pub fn as_map(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Returns the underlying map.
	pub fn into_map(self) -> JsonMap<String, JsonValue> {
		self.0
	}
}
impl From<JsonMap<String, JsonValue>> for IdentityClaims {
	fn from(value: JsonMap<String, JsonValue>) -> Self {
		Self(value)
	}
}
impl TryFrom<JsonValue> for IdentityClaims {
	type Error = Error;

	fn try_from(value: JsonValue) -> Result<Self> {
		match value {
			JsonValue::Object(map) => Ok(Self(map)),
			other => Err(Error::malformed(format!(
				"expected a JSON object of claims, found {}",
				json_kind(&other)
			))),
		}
	}
}

/// Authenticated Google account.
///
/// Only `sub` is required; every other accessor returns `None` when its claim is missing or has
/// an unexpected JSON type.
#[derive(Clone, Debug, PartialEq)]
pub struct GoogleUser {
	id: String,
	claims: IdentityClaims,
}
impl GoogleUser {
	/// Projects a user out of `claims`.
	///
	/// Fails with [`Error::MalformedResponse`] when `sub` is missing, empty, or neither a string
	/// nor a number.
	pub fn project(claims: IdentityClaims) -> Result<Self> {
		let id = match claims.get("sub") {
			Some(JsonValue::String(sub)) if !sub.is_empty() => sub.clone(),
			Some(JsonValue::Number(sub)) => sub.to_string(),
			Some(_) => return Err(Error::malformed("the `sub` claim is empty or not a string")),
			None => return Err(Error::malformed("the `sub` claim is missing")),
		};

		Ok(Self { id, claims })
	}

	/// Stable Google account identifier (`sub`).
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Preferred display name (`name`).
	pub fn name(&self) -> Option<&str> {
		self.claims.get_str("name")
	}

	/// Given name (`given_name`).
	pub fn first_name(&self) -> Option<&str> {
		self.claims.get_str("given_name")
	}

	/// Family name (`family_name`).
	pub fn last_name(&self) -> Option<&str> {
		self.claims.get_str("family_name")
	}

	/// Email address (`email`).
	pub fn email(&self) -> Option<&str> {
		self.claims.get_str("email")
	}

	/// Whether Google verified the email address (`email_verified`).
	///
	/// Accepts a JSON boolean or the strings `"true"`/`"false"`.
	pub fn email_verified(&self) -> Option<bool> {
		match self.claims.get("email_verified")? {
			JsonValue::Bool(verified) => Some(*verified),
			JsonValue::String(verified) if verified.eq_ignore_ascii_case("true") => Some(true),
			JsonValue::String(verified) if verified.eq_ignore_ascii_case("false") => Some(false),
			_ => None,
		}
	}

	/// Workspace hosted domain (`hd`); consumer accounts have none.
	pub fn hosted_domain(&self) -> Option<&str> {
		self.claims.get_str("hd")
	}

	/// Avatar image URL (`picture`).
	pub fn avatar(&self) -> Option<&str> {
		self.claims.get_str("picture")
	}

	/// Preferred locale (`locale`).
	pub fn locale(&self) -> Option<&str> {
		self.claims.get_str("locale")
	}

	/// Returns `true` when the email address can be used to link accounts.
	///
	/// Gmail addresses are verified by Google itself. Other addresses need a hosted domain and an
	/// explicit `email_verified` claim.
	pub fn is_email_trustworthy(&self) -> bool {
		let Some(email) = self.email() else {
			return false;
		};

		if email.ends_with(GMAIL_SUFFIX) {
			return true;
		}

		self.hosted_domain().is_some() && self.email_verified() == Some(true)
	}

	/// Borrows the projected claims.
	pub fn claims(&self) -> &IdentityClaims {
		&self.claims
	}

	/// Copies the projected claims into a new map.
	pub fn to_claims(&self) -> JsonMap<String, JsonValue> {
		self.claims.as_map().clone()
	}

	/// Returns the projected claims.
	pub fn into_claims(self) -> IdentityClaims {
		self.claims
	}
}
impl Serialize for GoogleUser {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		self.claims.serialize(serializer)
	}
}
impl TryFrom<IdentityClaims> for GoogleUser {
	type Error = Error;

	fn try_from(value: IdentityClaims) -> Result<Self> {
		Self::project(value)
	}
}

/// Projects a [`GoogleUser`] out of raw claims.
pub fn project(claims: IdentityClaims) -> Result<GoogleUser> {
	GoogleUser::project(claims)
}

fn json_kind(value: &JsonValue) -> &'static str {
	match value {
		JsonValue::Null => "null",
		JsonValue::Bool(_) => "a boolean",
		JsonValue::Number(_) => "a number",
		JsonValue::String(_) => "a string",
		JsonValue::Array(_) => "an array",
		JsonValue::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn user(value: JsonValue) -> GoogleUser {
		let claims = IdentityClaims::try_from(value).expect("Fixture should be a JSON object.");

		GoogleUser::project(claims).expect("Fixture should project into a user.")
	}

	#[test]
	fn accessors_read_openid_claims() {
		let user = user(json!({
			"sub": "12345",
			"name": "mock name",
			"given_name": "mock",
			"family_name": "name",
			"email": "mock.name@example.com",
			"hd": "example.com",
			"picture": "mock_image_url",
			"locale": "en"
		}));

		assert_eq!(user.id(), "12345");
		assert_eq!(user.name(), Some("mock name"));
		assert_eq!(user.first_name(), Some("mock"));
		assert_eq!(user.last_name(), Some("name"));
		assert_eq!(user.email(), Some("mock.name@example.com"));
		assert_eq!(user.hosted_domain(), Some("example.com"));
		assert_eq!(user.avatar(), Some("mock_image_url"));
		assert_eq!(user.locale(), Some("en"));
	}

	#[test]
	fn missing_optional_claims_are_none() {
		let user = user(json!({ "sub": "12345" }));

		assert_eq!(user.name(), None);
		assert_eq!(user.email(), None);
		assert_eq!(user.email_verified(), None);
		assert_eq!(user.hosted_domain(), None);
		assert_eq!(user.avatar(), None);
		assert_eq!(user.locale(), None);
	}

	#[test]
	fn missing_sub_is_malformed() {
		let claims = IdentityClaims::try_from(json!({ "name": "no id" }))
			.expect("Fixture should be a JSON object.");
		let err = GoogleUser::project(claims).expect_err("Claims without `sub` must be rejected.");

		assert!(matches!(err, Error::MalformedResponse { .. }));

		let err = IdentityClaims::try_from(json!(["sub"])).expect_err("Arrays are not claims.");

		assert!(matches!(err, Error::MalformedResponse { .. }));
	}

	#[test]
	fn numeric_sub_is_accepted() {
		assert_eq!(user(json!({ "sub": 42 })).id(), "42");
	}

	#[test]
	fn email_verified_accepts_strings() {
		assert_eq!(user(json!({ "sub": "1", "email_verified": "true" })).email_verified(), Some(true));
		assert_eq!(user(json!({ "sub": "1", "email_verified": false })).email_verified(), Some(false));
		assert_eq!(user(json!({ "sub": "1", "email_verified": "yes" })).email_verified(), None);
	}

	#[test]
	fn email_trust_rules() {
		assert!(user(json!({ "sub": "1", "email": "x@gmail.com" })).is_email_trustworthy());
		assert!(!user(json!({ "sub": "1", "email": "x@agmail.com" })).is_email_trustworthy());
		assert!(!user(json!({ "sub": "1", "email": "x@gmail.com.evil" })).is_email_trustworthy());
		assert!(
			user(json!({
				"sub": "1",
				"email": "x@corp.com",
				"hd": "corp.com",
				"email_verified": true
			}))
			.is_email_trustworthy()
		);
		assert!(
			!user(json!({
				"sub": "1",
				"email": "x@corp.com",
				"hd": "corp.com",
				"email_verified": false
			}))
			.is_email_trustworthy()
		);
		assert!(
			!user(json!({ "sub": "1", "email": "x@corp.com", "email_verified": true }))
				.is_email_trustworthy()
		);
		assert!(!user(json!({ "sub": "1", "hd": "corp.com" })).is_email_trustworthy());
	}

	#[test]
	fn claims_round_trip_without_changes() {
		let input = json!({ "sub": "1", "email": "x@gmail.com", "custom": [1, 2] });
		let user = user(input.clone());

		assert_eq!(JsonValue::Object(user.to_claims()), input);
		assert_eq!(serde_json::to_value(&user).expect("User should serialize."), input);
	}
}
