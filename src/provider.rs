//! Google provider configuration (data) and strategies (behavior).
//!
//! `config` exposes the validated [`GoogleConfig`]: credentials, redirect URI, hosted-domain
//! policy, default `access_type`/`prompt`, extra scopes, and HTTPS-only endpoints resolved from
//! an [`ApiVersion`]. `strategy` defines [`ProviderStrategy`], the hook flows consult to decorate
//! authorization parameters and classify token endpoint failures.

pub mod config;
pub mod endpoints;
pub mod strategy;

pub use config::*;
pub use endpoints::*;
pub use strategy::*;
