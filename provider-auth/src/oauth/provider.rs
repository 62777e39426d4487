//! OAuth provider trait and types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PkceVerifier, Tokens};
use crate::error::Error;

/// The identity providers a user can sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Twitch,
    Destinygg,
}

impl ProviderKind {
    /// Every supported provider, in the order they are shown to users.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Twitch, ProviderKind::Destinygg];

    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Twitch => "twitch",
            ProviderKind::Destinygg => "destinygg",
        }
    }

    /// URL path segment the provider's login routes are mounted under.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ProviderKind::Twitch => "twitch",
            ProviderKind::Destinygg => "dgg",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoints a provider adapter talks to.
#[derive(Debug, Clone)]
pub struct ProviderUrls {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// User information retrieved from OAuth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Provider's unique user identifier.
    pub id: String,
    /// Login handle, the name chat logs are recorded under.
    pub login: String,
    /// User's display name.
    pub display_name: String,
    /// User's email address. Only Twitch exposes one.
    pub email: Option<String>,
}

/// Trait for OAuth 2.0 identity providers.
///
/// Implementations handle platform-specific flows including:
/// - Authorization URL generation, with a PKCE challenge when supported
/// - Authorization code exchange for tokens
/// - Authenticated identity retrieval
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider kind.
    fn provider(&self) -> ProviderKind;

    /// Returns true if the provider expects a PKCE verifier at token exchange.
    fn uses_pkce(&self) -> bool {
        false
    }

    /// Authorization URL bound to `state`, for redirecting the user.
    ///
    /// # Arguments
    ///
    /// * `state` - CSRF state parameter for validation
    /// * `pkce_verifier` - Verifier the challenge is derived from, for PKCE providers
    fn authorization_url(
        &self,
        state: &str,
        pkce_verifier: Option<&PkceVerifier>,
    ) -> Result<String, Error>;

    /// Exchange authorization code for an access token.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from OAuth callback
    /// * `pkce_verifier` - PKCE code verifier if PKCE was used
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: Option<&PkceVerifier>,
    ) -> Result<Tokens, Error>;

    /// Get the identity the access token was issued to.
    async fn get_user_info(&self, tokens: &Tokens) -> Result<UserInfo, Error>;
}
