#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_google::{
	_preludet::*,
	auth::TokenSecret,
	error::{ProviderError, TransientError},
	provider::{ApiVersion, GoogleConfigBuilder},
};

fn build_client(
	server: &MockServer,
	path: &str,
	builder: GoogleConfigBuilder,
) -> ReqwestTestClient {
	let config = builder
		.userinfo_endpoint(
			Url::parse(&server.url(path))
				.expect("Mock userinfo endpoint should parse successfully."),
		)
		.build()
		.expect("Test configuration should build.");

	build_reqwest_test_client(config)
}

fn access_token() -> TokenSecret {
	TokenSecret::new("mock_access_token")
}

#[tokio::test]
async fn fetch_user_projects_openid_claims() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, "/v1/userinfo", test_config_builder());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/userinfo")
				.header("authorization", "Bearer mock_access_token")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body(
				r#"{"sub":"12345","name":"mock_name","given_name":"mock_first_name","family_name":"mock_last_name","email":"mock.name@example.com","email_verified":true,"hd":"example.com","picture":"mock_image_url","locale":"en"}"#,
			);
		})
		.await;
	let user = client.fetch_user(&access_token()).await.expect("Profile fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(user.id(), "12345");
	assert_eq!(user.name(), Some("mock_name"));
	assert_eq!(user.first_name(), Some("mock_first_name"));
	assert_eq!(user.last_name(), Some("mock_last_name"));
	assert_eq!(user.email(), Some("mock.name@example.com"));
	assert_eq!(user.email_verified(), Some(true));
	assert_eq!(user.hosted_domain(), Some("example.com"));
	assert_eq!(user.avatar(), Some("mock_image_url"));
	assert_eq!(user.locale(), Some("en"));
	assert_eq!(user.claims().get_str("sub"), Some("12345"));
}

#[tokio::test]
async fn fetch_user_adapts_plus_people_payloads() {
	let server = MockServer::start_async().await;
	let client = build_client(
		&server,
		"/plus/v1/people/me",
		test_config_builder().api_version(ApiVersion::PlusPeople).user_fields(["gender"]),
	);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/plus/v1/people/me")
				.query_param("alt", "json")
				.query_param_exists("fields")
				.header("authorization", "Bearer mock_access_token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"id":"12345","displayName":"mock_name","name":{"givenName":"mock_first_name","familyName":"mock_last_name"},"emails":[{"value":"mock_email"}],"image":{"url":"mock_image_url"},"domain":"example.com","language":"fr","gender":"x"}"#,
			);
		})
		.await;
	let user = client.fetch_user(&access_token()).await.expect("Profile fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(user.id(), "12345");
	assert_eq!(user.name(), Some("mock_name"));
	assert_eq!(user.first_name(), Some("mock_first_name"));
	assert_eq!(user.last_name(), Some("mock_last_name"));
	assert_eq!(user.email(), Some("mock_email"));
	assert_eq!(user.hosted_domain(), Some("example.com"));
	assert_eq!(user.avatar(), Some("mock_image_url"));
	assert_eq!(user.locale(), Some("fr"));
	assert_eq!(user.claims().get_str("gender"), Some("x"));
}

#[tokio::test]
async fn fetch_user_surfaces_error_payloads() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, "/v1/userinfo", test_config_builder());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userinfo");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"error":{"code":401,"message":"I am an error"}}"#);
		})
		.await;
	let err = client
		.fetch_user(&access_token())
		.await
		.expect_err("Error payloads should be rejected.");

	mock.assert_async().await;

	match err {
		Error::Provider(ProviderError { code, message, .. }) => {
			assert_eq!(code, 401);
			assert_eq!(message, "I am an error");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn fetch_user_rejects_string_errors_with_success_status() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, "/v1/userinfo", test_config_builder());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userinfo");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_token"}"#);
		})
		.await;
	let err = client
		.fetch_user(&access_token())
		.await
		.expect_err("Error payloads should be rejected even with HTTP 200.");

	assert!(matches!(err, Error::Provider(ProviderError { code: 0, .. })));
}

#[tokio::test]
async fn fetch_user_enforces_hosted_domain() {
	let server = MockServer::start_async().await;
	let client =
		build_client(&server, "/v1/userinfo", test_config_builder().hosted_domain("example.com"));
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userinfo");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"sub":"12345","email":"mock@wrong.example.com","hd":"wrong.example.com"}"#);
		})
		.await;
	let err = client
		.fetch_user(&access_token())
		.await
		.expect_err("Mismatched hosted domain should be rejected.");

	match err {
		Error::HostedDomain(err) => {
			assert_eq!(err.configured, "example.com");
			assert_eq!(err.claimed.as_deref(), Some("wrong.example.com"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn fetch_user_requires_subject() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, "/v1/userinfo", test_config_builder());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userinfo");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"email":"mock.name@example.com"}"#);
		})
		.await;
	let err = client
		.fetch_user(&access_token())
		.await
		.expect_err("Profiles without `sub` should be rejected.");

	assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn fetch_user_treats_unparseable_server_errors_as_transient() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, "/v1/userinfo", test_config_builder());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userinfo");
			then.status(503).header("retry-after", "7").body("upstream unavailable");
		})
		.await;
	let err = client
		.fetch_user(&access_token())
		.await
		.expect_err("Unparseable 503 responses should fail.");

	match err {
		Error::Transient(TransientError::Endpoint { endpoint, status, retry_after, .. }) => {
			assert_eq!(endpoint, "userinfo");
			assert_eq!(status, Some(503));
			assert_eq!(retry_after, Some(Duration::seconds(7)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn fetch_user_reports_unparseable_client_errors_as_provider_errors() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, "/v1/userinfo", test_config_builder());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userinfo");
			then.status(403).body("forbidden");
		})
		.await;
	let err = client
		.fetch_user(&access_token())
		.await
		.expect_err("Unparseable 403 responses should fail.");

	match err {
		Error::Provider(ProviderError { code, payload, .. }) => {
			assert_eq!(code, 403);
			assert_eq!(payload, JsonValue::String("forbidden".into()));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
