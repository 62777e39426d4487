//! Destiny.gg OAuth provider implementation.

use async_trait::async_trait;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use super::{network_error, read_json, url_with_params};
use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oauth::{PkceChallenge, PkceVerifier, ProviderKind, ProviderUrls, Tokens, UserInfo};

pub const AUTHORIZE_URL: &str = "https://www.destiny.gg/oauth/authorize";
pub const TOKEN_URL: &str = "https://www.destiny.gg/oauth/token";
pub const USERINFO_URL: &str = "https://www.destiny.gg/api/userinfo";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DestinyggUser {
    #[serde(rename = "userId", deserialize_with = "string_or_number")]
    user_id: String,
    nick: String,
}

/// Destiny.gg reports `userId` as a string, older deployments as a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Number(id) => id.to_string(),
    })
}

/// Destiny.gg OAuth provider.
///
/// Requires a PKCE verifier: the challenge sent at authorize time is bound
/// to the client secret, and the raw verifier is only revealed to the token
/// endpoint.
pub struct Provider {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    urls: ProviderUrls,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Destiny.gg OAuth provider against the public endpoints.
    pub fn new(
        client_id: String,
        client_secret: SecretString,
        redirect_uri: String,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            urls: Self::default_urls(),
            http_client,
        }
    }

    /// Point the provider at different endpoints.
    pub fn with_urls(mut self, urls: ProviderUrls) -> Self {
        self.urls = urls;
        self
    }

    pub fn default_urls() -> ProviderUrls {
        ProviderUrls {
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    fn require_verifier(pkce_verifier: Option<&PkceVerifier>) -> Result<&PkceVerifier, Error> {
        pkce_verifier.ok_or_else(|| {
            oauth_error(
                OAuthErrorKind::PkceVerificationFailed,
                "Destiny.gg requires a PKCE verifier",
            )
        })
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Destinygg
    }

    fn uses_pkce(&self) -> bool {
        true
    }

    fn authorization_url(
        &self,
        state: &str,
        pkce_verifier: Option<&PkceVerifier>,
    ) -> Result<String, Error> {
        let verifier = Self::require_verifier(pkce_verifier)?;
        let challenge =
            PkceChallenge::with_client_secret(verifier, self.client_secret.expose_secret());

        url_with_params(
            &self.urls.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
                ("code_challenge", challenge.as_str()),
            ],
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: Option<&PkceVerifier>,
    ) -> Result<Tokens, Error> {
        let verifier = Self::require_verifier(pkce_verifier)?;

        debug!("Exchanging Destiny.gg OAuth code for tokens");

        let response = self
            .http_client
            .get(&self.urls.token_url)
            .query(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code_verifier", verifier.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Destiny.gg OAuth code: {:?}", e);
                network_error(e)
            })?;

        let token: TokenResponse = read_json(
            response,
            OAuthErrorKind::TokenExchangeFailed,
            "Destiny.gg token endpoint",
        )
        .await?;

        Ok(Tokens::new(token.access_token))
    }

    async fn get_user_info(&self, tokens: &Tokens) -> Result<UserInfo, Error> {
        let response = self
            .http_client
            .get(&self.urls.userinfo_url)
            .query(&[("token", tokens.access_token.expose_secret().as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to get Destiny.gg user info: {:?}", e);
                network_error(e)
            })?;

        let user: DestinyggUser = read_json(
            response,
            OAuthErrorKind::InvalidResponse,
            "Destiny.gg userinfo endpoint",
        )
        .await?;

        if user.nick.is_empty() || user.user_id.is_empty() {
            warn!("Destiny.gg userinfo returned an incomplete identity");
            return Err(oauth_error(
                OAuthErrorKind::InvalidResponse,
                "Destiny.gg returned an incomplete identity",
            ));
        }

        Ok(UserInfo {
            id: user.user_id,
            login: user.nick.clone(),
            display_name: user.nick,
            email: None,
        })
    }
}
