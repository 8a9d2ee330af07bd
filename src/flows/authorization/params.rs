// self
use crate::{_prelude::*, auth::ScopeList, provider::GoogleConfig};

/// Per-call overrides for the authorization redirect.
///
/// Empty strings count as "not set", so a blank override falls back to the configured default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationOptions {
	/// Hosted-domain hint (`hd`).
	pub hd: Option<String>,
	/// `access_type` (`online` or `offline`).
	pub access_type: Option<String>,
	/// `prompt` (`none`, `consent`, `select_account`).
	pub prompt: Option<String>,
	/// Legacy `approval_prompt`; dropped whenever a `prompt` is present.
	pub approval_prompt: Option<String>,
	/// Scopes requested on top of the defaults and configured scopes.
	pub scope: Vec<String>,
	/// `login_hint` (email address or `sub`).
	pub login_hint: Option<String>,
	/// `include_granted_scopes` for incremental authorization.
	pub include_granted_scopes: Option<bool>,
	/// Caller-supplied `state`; a random one is generated when absent.
	pub state: Option<String>,
	/// Additional query parameters forwarded untouched.
	pub extra: BTreeMap<String, String>,
}
impl AuthorizationOptions {
	/// Sets the `hd` hint.
	pub fn hd(mut self, hd: impl Into<String>) -> Self {
		self.hd = Some(hd.into());

		self
	}

	/// Sets `access_type`.
	pub fn access_type(mut self, access_type: impl Into<String>) -> Self {
		self.access_type = Some(access_type.into());

		self
	}

	/// Sets `prompt`.
	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());

		self
	}

	/// Sets `approval_prompt`.
	pub fn approval_prompt(mut self, approval_prompt: impl Into<String>) -> Self {
		self.approval_prompt = Some(approval_prompt.into());

		self
	}

	/// Adds a scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope.push(scope.into());

		self
	}

	/// Adds several scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Sets `login_hint`.
	pub fn login_hint(mut self, hint: impl Into<String>) -> Self {
		self.login_hint = Some(hint.into());

		self
	}

	/// Sets `include_granted_scopes`.
	pub fn include_granted_scopes(mut self, include: bool) -> Self {
		self.include_granted_scopes = Some(include);

		self
	}

	/// Sets `state`.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Adds an arbitrary query parameter.
	pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

/// Final authorization query parameters, keyed by name.
///
/// `scope` is already joined with single spaces. `prompt` and `approval_prompt` never appear
/// together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationParameters(BTreeMap<String, String>);
impl AuthorizationParameters {
	/// Merges `options` with the configured defaults.
	///
	/// Never fails: empty values are treated as absent and invalid per-call scopes are skipped.
	pub fn build(config: &GoogleConfig, options: &AuthorizationOptions) -> Self {
		let mut params = Self::default();

		for (key, value) in &options.extra {
			params.insert(key.clone(), value.clone());
		}

		let hd = present(&options.hd)
			.or_else(|| config.hosted_domain.as_ref().and_then(|policy| policy.hint()));
		let access_type = present(&options.access_type).or(config.access_type.as_deref());
		let prompt = present(&options.prompt).or(config.prompt.as_deref());

		params.insert_opt("hd", hd);
		params.insert_opt("access_type", access_type);
		params.insert_opt("prompt", prompt);
		params.insert_opt("approval_prompt", present(&options.approval_prompt));
		params.insert_opt("login_hint", present(&options.login_hint));
		params.insert_opt("state", present(&options.state));

		if let Some(include) = options.include_granted_scopes {
			params.insert("include_granted_scopes", include.to_string());
		}

		let mut scopes = config.default_scopes();

		scopes.merge_lenient(config.scopes.iter());
		scopes.merge_lenient(options.scope.iter().map(String::as_str));
		params.insert("scope", scopes.normalized());
		params.enforce_prompt_exclusion();

		params
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns `true` when `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Sets `key`; empty values remove it instead.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		if value.is_empty() {
			self.0.remove(&key);
		} else {
			self.0.insert(key, value);
		}
	}

	/// Removes `key`, returning its value.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.0.remove(key)
	}

	/// Space-joined scope value.
	pub fn scope(&self) -> Option<&str> {
		self.get("scope")
	}

	/// Parsed scope list, in request order.
	pub fn scopes(&self) -> ScopeList {
		let mut scopes = ScopeList::default();

		scopes.merge_lenient(self.scope().unwrap_or_default().split(' '));

		scopes
	}

	/// Iterates parameters in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the underlying map.
	pub fn into_map(self) -> BTreeMap<String, String> {
		self.0
	}

	/// Drops `approval_prompt` whenever `prompt` is present.
	pub(crate) fn enforce_prompt_exclusion(&mut self) {
		if self.contains_key("prompt") {
			self.0.remove("approval_prompt");
		}
	}

	fn insert_opt(&mut self, key: &str, value: Option<&str>) {
		if let Some(value) = value {
			self.insert(key, value);
		}
	}
}

fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|value| !value.is_empty())
}
