#![cfg(feature = "reqwest")]

// crates.io
use serde_json::json;
use url::Url;
// self
use oauth2_google::{
	auth::{DomainMatch, DomainPolicy, validate_hosted_domain},
	error::{Error, HostedDomainError},
	flows::{GoogleClient, ReqwestGoogleClient},
	provider::GoogleConfig,
	user::IdentityClaims,
};

fn client(policy: Option<&str>) -> ReqwestGoogleClient {
	let mut builder = GoogleConfig::builder("mock_client_id").redirect_uri(
		Url::parse("https://app.example.com/oauth/callback")
			.expect("Redirect URI fixture should parse successfully."),
	);

	if let Some(policy) = policy {
		builder = builder.hosted_domain(policy);
	}

	GoogleClient::new(builder.build().expect("Test configuration should build."))
}

fn claims(hd: Option<&str>) -> IdentityClaims {
	let mut value = json!({
		"sub": "12345",
		"name": "mock_name",
		"email": "mock.name@example.com",
		"email_verified": true
	});

	if let Some(hd) = hd {
		value["hd"] = json!(hd);
	}

	IdentityClaims::try_from(value).expect("Claims fixture should be a JSON object.")
}

#[test]
fn validation_matrix() {
	let cases = [
		(None, None, true),
		(None, Some("anything.example"), true),
		(Some("example.com"), Some("example.com"), true),
		(Some("example.com"), Some("wrong.example.com"), false),
		(Some("example.com"), None, false),
		(Some("a.com,b.com"), Some("b.com"), true),
		(Some("a.com,b.com"), Some("c.com"), false),
		(Some("*"), Some("anything.example"), true),
		(Some("*"), None, false),
		(Some("(corp|labs)\\.example\\.com"), Some("labs.example.com"), true),
		(Some("(corp|labs)\\.example\\.com"), Some("example.org"), false),
	];

	for (policy, claimed, accepted) in cases {
		let policy = policy.map(DomainPolicy::parse);
		let verdict = validate_hosted_domain(policy.as_ref(), claimed);

		assert_eq!(
			verdict.is_ok(),
			accepted,
			"Policy {policy:?} with claim {claimed:?} returned {verdict:?}."
		);
	}
}

#[test]
fn match_kind_is_reported() {
	let policy = DomainPolicy::parse("example.com,*");

	assert_eq!(validate_hosted_domain(Some(&policy), Some("example.com")), Ok(DomainMatch::Exact));
	assert_eq!(
		validate_hosted_domain(Some(&policy), Some("elsewhere.example")),
		Ok(DomainMatch::Wildcard)
	);
}

#[test]
fn create_user_accepts_matching_domain() {
	let user = client(Some("example.com"))
		.create_user(claims(Some("example.com")))
		.expect("Matching hosted domain should be accepted.");

	assert_eq!(user.id(), "12345");
	assert_eq!(user.hosted_domain(), Some("example.com"));
	assert!(user.is_email_trustworthy());
}

#[test]
fn create_user_rejects_mismatched_domain() {
	let err = client(Some("example.com"))
		.create_user(claims(Some("wrong.example.com")))
		.expect_err("Mismatched hosted domain should be rejected.");

	match err {
		Error::HostedDomain(HostedDomainError { configured, claimed }) => {
			assert_eq!(configured, "example.com");
			assert_eq!(claimed.as_deref(), Some("wrong.example.com"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[test]
fn create_user_rejects_consumer_accounts_under_a_policy() {
	let err = client(Some("*"))
		.create_user(claims(None))
		.expect_err("Accounts without a hosted domain should be rejected.");

	assert!(matches!(err, Error::HostedDomain(HostedDomainError { claimed: None, .. })));
}

#[test]
fn create_user_without_policy_accepts_consumer_accounts() {
	let user =
		client(None).create_user(claims(None)).expect("No policy should accept any account.");

	assert_eq!(user.hosted_domain(), None);
	assert!(!user.is_email_trustworthy());
}

#[test]
fn domain_check_runs_after_projection() {
	let claims = IdentityClaims::try_from(json!({ "hd": "example.com" }))
		.expect("Claims fixture should be a JSON object.");
	let err = client(Some("example.com"))
		.create_user(claims)
		.expect_err("Claims without `sub` should be rejected.");

	assert!(matches!(err, Error::MalformedResponse { .. }));
}
