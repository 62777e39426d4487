use std::sync::Arc;
use std::time::Duration;

use domain::deletion_preference::{DbStore, Store};
use domain::jwt::Keys;
use domain::login::Logins;
use domain::ProviderKind;
use handlebars::Handlebars;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use error::{Error, Result};

mod controller;
mod cookie;
mod error;
mod middleware;
mod router;
mod view;


/// Everything a request handler needs, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub logins: Logins,
    pub session_keys: Arc<Keys>,
    pub preferences: Arc<dyn Store>,
    templates: Arc<Handlebars<'static>>,
}

impl AppState {
    pub fn new(
        config: Config,
        logins: Logins,
        session_keys: Keys,
        preferences: Arc<dyn Store>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            logins,
            session_keys: Arc::new(session_keys),
            preferences,
            templates: Arc::new(view::templates()?),
        })
    }

    /// Wire up providers, session keys and the Postgres preference store.
    pub fn from_config(config: Config, db: Arc<DatabaseConnection>) -> Result<Self> {
        let logins = Logins::from_config(&config)?;
        let session_keys = Keys::from_config(&config)?;
        Self::new(config, logins, session_keys, Arc::new(DbStore::new(db)))
    }

    /// Name of the cookie holding `kind`'s session.
    pub fn cookie_name(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Twitch => self.config.twitch_cookie(),
            ProviderKind::Destinygg => self.config.dgg_cookie(),
        }
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = &app_state.config;
    let interface = config.interface.as_deref().unwrap_or("127.0.0.1");
    let listen_addr = format!("{}:{}", interface, config.port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let reapers: Vec<JoinHandle<()>> = app_state.logins.spawn_reapers(Duration::from_secs(
        config.oauth_state_reap_interval_seconds,
    ));

    let listener = TcpListener::bind(listen_addr).await?;
    let app = router::define_routes(app_state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reapers.iter().for_each(JoinHandle::abort);
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(err) => error!("Failed to listen for shutdown signal: {err}"),
    }
}
