//! Auth-domain models: scope lists, hosted-domain policies, and issued tokens.

pub mod domain;
pub mod scope;
pub mod token;

pub use domain::*;
pub use scope::*;
pub use token::*;
