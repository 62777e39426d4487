//! The authorization-code handshake, written once against [`Provider`].
//!
//! `begin` registers a one-time state (plus a PKCE verifier for providers that
//! want one) and returns the URL to send the browser to. `complete` redeems
//! that state when the provider redirects back, trades the code for an
//! identity and mints a session.

use log::*;
use provider_auth::http::ClientBuilder;
use provider_auth::oauth::providers::{destinygg, twitch};
use provider_auth::oauth::{PkceVerifier, Provider, ProviderKind, StateManager, StateStore};
use secrecy::SecretString;
use service::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::{AuthErrorKind, Error};
use crate::jwt::{Keys, Session};

/// One provider together with the state store its attempts are tracked in.
#[derive(Clone)]
pub struct LoginFlow {
    provider: Arc<dyn Provider>,
    states: StateManager,
}

impl LoginFlow {
    pub fn new(provider: Arc<dyn Provider>, states: StateManager) -> Self {
        debug_assert_eq!(provider.provider(), states.provider());
        Self { provider, states }
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.provider()
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }
}

/// Both login flows, resolved by [`ProviderKind`].
#[derive(Clone)]
pub struct Logins {
    twitch: LoginFlow,
    destinygg: LoginFlow,
}

impl Logins {
    pub fn new(twitch: LoginFlow, destinygg: LoginFlow) -> Self {
        Self { twitch, destinygg }
    }

    /// Build both providers from configuration, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let http_client = provider_client(config).build()?;
        let ttl = Duration::from_secs(config.oauth_state_ttl_seconds);

        let twitch = twitch::Provider::new(
            required(config.twitch_client_id(), "TWITCH_CLIENT_ID")?,
            SecretString::new(required(
                config.twitch_client_secret(),
                "TWITCH_CLIENT_SECRET",
            )?),
            required(config.twitch_redirect_uri(), "TWITCH_REDIRECT_URI")?,
            http_client.clone(),
        );
        let destinygg = destinygg::Provider::new(
            required(config.dgg_client_id(), "DGG_CLIENT_ID")?,
            SecretString::new(required(config.dgg_client_secret(), "DGG_CLIENT_SECRET")?),
            required(config.dgg_redirect_uri(), "DGG_REDIRECT_URI")?,
            http_client,
        );

        Ok(Self::new(
            LoginFlow::new(
                Arc::new(twitch),
                StateManager::with_ttl(ProviderKind::Twitch, ttl),
            ),
            LoginFlow::new(
                Arc::new(destinygg),
                StateManager::with_ttl(ProviderKind::Destinygg, ttl),
            ),
        ))
    }

    pub fn get(&self, kind: ProviderKind) -> &LoginFlow {
        match kind {
            ProviderKind::Twitch => &self.twitch,
            ProviderKind::Destinygg => &self.destinygg,
        }
    }

    /// Start one expired-state sweeper per provider.
    pub fn spawn_reapers(&self, every: Duration) -> Vec<JoinHandle<()>> {
        ProviderKind::ALL
            .iter()
            .map(|kind| self.get(*kind).states.spawn_reaper(every))
            .collect()
    }
}

/// HTTP client settings shared by both providers.
fn provider_client(config: &Config) -> ClientBuilder {
    ClientBuilder::new().with_timeout(Duration::from_secs(config.provider_timeout_seconds))
}

fn required(value: Option<String>, name: &str) -> Result<String, Error> {
    value.ok_or_else(|| {
        warn!("Failed to get {name} from config");
        Error::config(name)
    })
}

/// Register a new attempt and return the provider URL to redirect to.
pub fn begin(flow: &LoginFlow) -> Result<String, Error> {
    let verifier = flow.provider.uses_pkce().then(PkceVerifier::generate);
    let state = flow.states.issue(verifier.clone());

    let url = flow
        .provider
        .authorization_url(&state, verifier.as_ref())
        .inspect_err(|_| {
            // The attempt can never complete; drop it now rather than waiting for expiry.
            flow.states.consume(&state);
        })?;

    debug!("Started {} login", flow.kind());
    Ok(url)
}

/// Finish an attempt from the provider's callback parameters.
///
/// The state is redeemed before anything else, so a failed exchange still
/// burns it and the user has to start over.
pub async fn complete(
    flow: &LoginFlow,
    keys: &Keys,
    state: Option<&str>,
    code: Option<&str>,
) -> Result<Session, Error> {
    let kind = flow.kind();

    let pending = state
        .filter(|state| !state.is_empty())
        .and_then(|state| flow.states.consume(state))
        .ok_or_else(|| {
            warn!("Rejecting {kind} callback with missing, unknown or expired state");
            Error::auth(AuthErrorKind::InvalidState)
        })?;

    let code = code.filter(|code| !code.is_empty()).ok_or_else(|| {
        warn!("{kind} callback carried no authorization code");
        Error::provider("authorization code missing from callback")
    })?;

    let tokens = flow
        .provider
        .exchange_code(code, pending.verifier.as_ref())
        .await
        .inspect_err(|err| warn!("{kind} code exchange failed: {err}"))?;

    let user = flow
        .provider
        .get_user_info(&tokens)
        .await
        .inspect_err(|err| warn!("{kind} identity lookup failed: {err}"))?;

    let session = keys.issue(&user, kind)?;
    info!(
        "{} logged in with {kind} as {}",
        user.display_name, user.login
    );
    Ok(session)
}
