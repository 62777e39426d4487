//! OAuth 2.0 authorization-code infrastructure.
//!
//! Provides CSRF state handling, PKCE and the identity provider capability
//! used by the login flow.

mod pkce;
mod provider;
mod state;
mod tokens;

pub mod providers;

pub use pkce::{PkceChallenge, PkceVerifier};
pub use provider::{Provider, ProviderKind, ProviderUrls, UserInfo};
pub use state::{PendingAuth, StateManager, StateStore, DEFAULT_STATE_TTL, MAX_STATE_TTL};
pub use tokens::Tokens;
