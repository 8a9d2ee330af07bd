//! Claims-schema adapters and error-payload detection for profile responses.

// self
use crate::{_prelude::*, error::ProviderError, user::IdentityClaims};

/// Shape of the profile payload returned by the configured API generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProfileSchema {
	/// OpenID Connect claims (`sub`, `given_name`, ...), used as-is.
	#[default]
	OpenIdConnect,
	/// Google+ `people/me` resource (`id`, `displayName`, `emails[]`, ...).
	PlusPeople,
}
impl ProfileSchema {
	/// Converts a profile payload into OpenID Connect claims.
	///
	/// Google+ keys without an OpenID Connect counterpart (extra `userFields`) are kept under
	/// their original names.
	pub fn normalize(self, payload: JsonMap<String, JsonValue>) -> IdentityClaims {
		match self {
			ProfileSchema::OpenIdConnect => IdentityClaims::new(payload),
			ProfileSchema::PlusPeople => IdentityClaims::new(normalize_plus(payload)),
		}
	}
}

/// Rejects profile or token payloads that carry an `error` member.
///
/// `{"error": {"code", "message"}}` keeps the nested code and message; `{"error": "..."}` uses
/// code `0`. A non-2xx status without an `error` member is reported with the status as code.
pub fn check_response(status: u16, payload: &JsonValue) -> Result<(), ProviderError> {
	let error = payload.get("error").filter(|error| !is_blank(error));
	let (code, message) = match error {
		Some(JsonValue::Object(error)) => (
			error.get("code").and_then(JsonValue::as_i64).unwrap_or(0),
			error.get("message").and_then(JsonValue::as_str).unwrap_or_default().to_owned(),
		),
		Some(JsonValue::String(message)) => (0, message.clone()),
		Some(other) => (0, other.to_string()),
		None if (200..300).contains(&status) => return Ok(()),
		None => (i64::from(status), format!("HTTP status {status}")),
	};

	Err(ProviderError { code, message, payload: payload.clone() })
}

fn normalize_plus(mut payload: JsonMap<String, JsonValue>) -> JsonMap<String, JsonValue> {
	let mut claims = JsonMap::new();

	if let Some(id) = payload.remove("id") {
		claims.insert("sub".into(), id);
	}
	if let Some(name) = payload.remove("displayName") {
		claims.insert("name".into(), name);
	}
	if let Some(JsonValue::Object(mut name)) = payload.remove("name") {
		if let Some(given) = name.remove("givenName") {
			claims.insert("given_name".into(), given);
		}
		if let Some(family) = name.remove("familyName") {
			claims.insert("family_name".into(), family);
		}
	}
	if let Some(email) = payload.remove("emails").and_then(first_email) {
		claims.insert("email".into(), email);
	}
	if let Some(domain) = payload.remove("domain") {
		claims.insert("hd".into(), domain);
	}
	if let Some(url) = payload.remove("image").and_then(|image| match image {
		JsonValue::Object(mut image) => image.remove("url"),
		_ => None,
	}) {
		claims.insert("picture".into(), url);
	}
	if let Some(language) = payload.remove("language") {
		claims.insert("locale".into(), language);
	}

	for (key, value) in payload {
		claims.entry(key).or_insert(value);
	}

	claims
}

fn first_email(emails: JsonValue) -> Option<JsonValue> {
	match emails {
		JsonValue::Array(emails) => emails.into_iter().find_map(|email| match email {
			JsonValue::Object(mut email) => email.remove("value"),
			_ => None,
		}),
		_ => None,
	}
}

fn is_blank(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => true,
		JsonValue::Bool(flag) => !flag,
		JsonValue::String(text) => text.is_empty() || text == "0",
		JsonValue::Array(items) => items.is_empty(),
		JsonValue::Object(_) => false,
		JsonValue::Number(number) => number.as_f64() == Some(0.0),
	}
}
