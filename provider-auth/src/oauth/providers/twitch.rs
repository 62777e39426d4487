//! Twitch OAuth provider implementation.

use async_trait::async_trait;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{network_error, read_json, url_with_params};
use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oauth::{PkceVerifier, ProviderKind, ProviderUrls, Tokens, UserInfo};

pub const AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";
pub const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const USERINFO_URL: &str = "https://api.twitch.tv/helix/users";

/// Scope needed for Helix to include the email address.
const SCOPE: &str = "user:read:email";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    data: Vec<TwitchUser>,
}

#[derive(Debug, Deserialize)]
struct TwitchUser {
    id: String,
    login: String,
    display_name: String,
    #[serde(default)]
    email: Option<String>,
}

/// Twitch OAuth provider.
///
/// Plain authorization-code flow; Twitch is not sent a PKCE challenge.
pub struct Provider {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    urls: ProviderUrls,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Twitch OAuth provider against the public Twitch endpoints.
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
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Twitch
    }

    fn authorization_url(
        &self,
        state: &str,
        _pkce_verifier: Option<&PkceVerifier>,
    ) -> Result<String, Error> {
        url_with_params(
            &self.urls.authorize_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        _pkce_verifier: Option<&PkceVerifier>,
    ) -> Result<Tokens, Error> {
        debug!("Exchanging Twitch OAuth code for tokens");

        let response = self
            .http_client
            .post(&self.urls.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret().as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Twitch OAuth code: {:?}", e);
                network_error(e)
            })?;

        let token: TokenResponse =
            read_json(response, OAuthErrorKind::TokenExchangeFailed, "Twitch token endpoint")
                .await?;

        Ok(Tokens::new(token.access_token))
    }

    async fn get_user_info(&self, tokens: &Tokens) -> Result<UserInfo, Error> {
        let response = self
            .http_client
            .get(&self.urls.userinfo_url)
            .bearer_auth(tokens.access_token.expose_secret())
            .header("Client-Id", &self.client_id)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to get Twitch user info: {:?}", e);
                network_error(e)
            })?;

        let users: UsersResponse =
            read_json(response, OAuthErrorKind::InvalidResponse, "Twitch users endpoint").await?;

        let user = users.data.into_iter().next().ok_or_else(|| {
            warn!("Twitch users endpoint returned no user for the access token");
            oauth_error(OAuthErrorKind::InvalidResponse, "Twitch returned no user")
        })?;

        Ok(UserInfo {
            id: user.id,
            login: user.login,
            display_name: user.display_name,
            email: user.email.filter(|email| !email.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::http::ClientBuilder;
    use crate::oauth::Provider as _;
    use mockito::Matcher;

    fn provider(server_url: &str) -> Provider {
        Provider::new(
            "client-id".to_string(),
            SecretString::new("client-secret".to_string()),
            "http://localhost:8080/twitch/callback".to_string(),
            ClientBuilder::new().build().unwrap(),
        )
        .with_urls(ProviderUrls {
            authorize_url: format!("{server_url}/oauth2/authorize"),
            token_url: format!("{server_url}/oauth2/token"),
            userinfo_url: format!("{server_url}/helix/users"),
        })
    }

    fn tokens() -> Tokens {
        Tokens::new("access".to_string())
    }

    #[test]
    fn authorization_url_carries_state_without_challenge() {
        let provider = provider("https://id.twitch.tv");
        let url = provider.authorization_url("abc123", None).unwrap();
        let url = url::Url::parse(&url).unwrap();
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(params.contains(&("state".to_string(), "abc123".to_string())));
        assert!(params.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        assert!(params.contains(&("scope".to_string(), SCOPE.to_string())));
        assert!(!params.iter().any(|(k, _)| k == "code_challenge"));
        assert!(!provider.uses_pkce());
    }

    #[tokio::test]
    async fn exchange_code_posts_form_and_parses_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "the-code".into()),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("client_secret".into(), "client-secret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"at","refresh_token":"rt","expires_in":3600,"scope":["user:read:email"],"token_type":"bearer"}"#,
            )
            .create_async()
            .await;

        let tokens = provider(&server.url())
            .exchange_code("the-code", None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(tokens.access_token.expose_secret(), "at");
    }

    #[tokio::test]
    async fn exchange_code_fails_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_body(r#"{"status":400,"message":"Invalid authorization code"}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .exchange_code("bad-code", None)
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
        );
    }

    #[tokio::test]
    async fn get_user_info_sends_client_id_and_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/helix/users")
            .match_header("authorization", "Bearer access")
            .match_header("client-id", "client-id")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"id":"u1","login":"bob","display_name":"Bob","email":"bob@example.com"}]}"#,
            )
            .create_async()
            .await;

        let user = provider(&server.url())
            .get_user_info(&tokens())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            user,
            UserInfo {
                id: "u1".to_string(),
                login: "bob".to_string(),
                display_name: "Bob".to_string(),
                email: Some("bob@example.com".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn get_user_info_rejects_empty_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/helix/users")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .get_user_info(&tokens())
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::InvalidResponse));
    }

    #[tokio::test]
    async fn get_user_info_rejects_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/helix/users")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"users":"nope"}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .get_user_info(&tokens())
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::InvalidResponse));
    }
}
