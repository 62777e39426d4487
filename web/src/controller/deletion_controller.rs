//! Toggling the "do not retain my chat logs" preference.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::Extension;
use domain::deletion_preference;
use domain::jwt::SessionClaims;

use crate::{AppState, Error};

/// GET /<provider>/delete
///
/// Records that the signed-in user's logs should no longer be kept.
pub async fn delete(
    State(app_state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, Error> {
    deletion_preference::request_deletion(app_state.preferences.as_ref(), &claims).await?;
    Ok(Redirect::temporary("/?delete=true"))
}

/// GET /<provider>/undelete
pub async fn undelete(
    State(app_state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, Error> {
    deletion_preference::cancel_deletion(app_state.preferences.as_ref(), &claims).await?;
    Ok(Redirect::temporary("/?delete=false"))
}
