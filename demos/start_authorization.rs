//! Builds a Google sign-in redirect restricted to one workspace domain and stores the session
//! until the callback arrives.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_google::{
	flows::{AuthorizationOptions, GoogleClient},
	provider::GoogleConfig,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = GoogleConfig::builder("demo-client.apps.googleusercontent.com")
		.client_secret("demo-secret")
		.redirect_uri(Url::parse("https://app.example.com/oauth/callback")?)
		.hosted_domain("example.com")
		.access_type("offline")
		.pkce_required(true)
		.build()?;
	let client = GoogleClient::new(config);
	let options = AuthorizationOptions::default()
		.prompt("select_account")
		.scope("https://www.googleapis.com/auth/calendar.readonly");
	let session = client.start_authorization(&options);

	println!("Send your user to {}.", &session.authorize_url);
	println!("PKCE challenge: {:?}.", session.code_challenge());

	let mut sessions = HashMap::new();

	sessions.insert(session.state.clone(), session.clone());

	// Simulate the redirect handler looking up the stored session by `state`.
	let returned_state = session.state.clone();

	if let Some(stashed) = sessions.remove(&returned_state) {
		stashed.validate_state(&returned_state)?;
		println!("Validated state; the session carries scope {:?}.", stashed.parameters.scope());
		println!("Call GoogleClient::complete_authorization with the returned code next.");
	} else {
		eprintln!("State `{returned_state}` was not recognized.");
	}

	Ok(())
}
