//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, SameSite};
use domain::ProviderKind;

use crate::AppState;

/// Cookie carrying a freshly issued session for `kind`.
pub(crate) fn session_cookie(
    app_state: &AppState,
    kind: ProviderKind,
    token: String,
) -> Cookie<'static> {
    let max_age = i64::try_from(app_state.session_keys.expiry().as_secs()).unwrap_or(i64::MAX);

    Cookie::build((app_state.cookie_name(kind).to_owned(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(app_state.config.is_production())
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie that, removed from a jar, makes the browser drop `kind`'s session.
pub(crate) fn removal_cookie(app_state: &AppState, kind: ProviderKind) -> Cookie<'static> {
    Cookie::build((app_state.cookie_name(kind).to_owned(), String::new()))
        .path("/")
        .build()
}
