//! # provider-auth
//!
//! OAuth 2.0 plumbing for the two identity providers users can sign in with:
//! - CSRF state management with per-entry expiry
//! - PKCE verifiers and the secret-bound challenge Destiny.gg expects
//! - The `Provider` capability and its Twitch and Destiny.gg implementations
//! - HTTP client building with a bounded request timeout
//!
//! ## Usage
//!
//! ```rust,ignore
//! use provider_auth::oauth::{providers, PkceVerifier, Provider, StateManager, StateStore};
//!
//! let states = StateManager::new(ProviderKind::Destinygg);
//! let verifier = PkceVerifier::generate();
//! let state = states.issue(Some(verifier.clone()));
//! let url = provider.authorization_url(&state, Some(&verifier))?;
//! ```

pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
