//! Login, callback and logout for both identity providers.
//!
//! Each handler is mounted once per provider; the provider it serves comes
//! from the `ProviderKind` extension set on its router.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Extension;
use axum_extra::extract::CookieJar;
use domain::{login, ProviderKind};
use log::*;
use serde::Deserialize;

use crate::cookie::{removal_cookie, session_cookie};
use crate::{AppState, Error};

/// Query parameters the provider redirects back with.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declined.
    pub error: Option<String>,
}

/// GET /<provider>/login
///
/// Starts a new attempt and redirects to the provider's authorization page.
pub async fn login(
    State(app_state): State<AppState>,
    Extension(kind): Extension<ProviderKind>,
) -> Result<impl IntoResponse, Error> {
    let url = login::begin(app_state.logins.get(kind))?;
    Ok(Redirect::temporary(&url))
}

/// GET /<provider>/callback
///
/// A bad `state` is answered with 401. Any failure after the state checks
/// out is logged and sends the user back to `/` without a session.
pub async fn callback(
    State(app_state): State<AppState>,
    Extension(kind): Extension<ProviderKind>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, Error> {
    if let Some(reason) = &params.error {
        info!("{kind} authorization was not granted: {reason}");
    }

    let result = login::complete(
        app_state.logins.get(kind),
        &app_state.session_keys,
        params.state.as_deref(),
        params.code.as_deref(),
    )
    .await;

    match result {
        Ok(session) => {
            let jar = jar.add(session_cookie(&app_state, kind, session.token));
            Ok((jar, Redirect::temporary("/")).into_response())
        }
        Err(err) if err.is_auth() => Err(err.into()),
        Err(err) => {
            error!("{kind} login failed: {err}");
            Ok(Redirect::temporary("/").into_response())
        }
    }
}

/// GET /<provider>/logout
///
/// Sessions are stateless, so logging out only drops the cookie.
pub async fn logout(
    State(app_state): State<AppState>,
    Extension(kind): Extension<ProviderKind>,
    jar: CookieJar,
) -> impl IntoResponse {
    debug!("Logging out of {kind}");
    (
        jar.remove(removal_cookie(&app_state, kind)),
        Redirect::temporary("/"),
    )
}
