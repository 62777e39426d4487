use axum::extract::{Query, State};
use axum::response::Html;
use axum_extra::extract::CookieJar;
use domain::deletion_preference;
use domain::jwt::SessionClaims;
use domain::ProviderKind;
use log::*;
use serde::Deserialize;

use crate::cookie::removal_cookie;
use crate::view::{self, ProviderStatus, StatusPayload};
use crate::{AppState, Error};

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub delete: Option<String>,
}

/// GET /
///
/// Each provider's cookie is checked on its own. A missing cookie just means
/// logged out; an invalid one is also cleared.
pub async fn index(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<IndexParams>,
) -> Result<(CookieJar, Html<String>), Error> {
    let (jar, twitch) = provider_status(&app_state, jar, ProviderKind::Twitch).await?;
    let (jar, destinygg) = provider_status(&app_state, jar, ProviderKind::Destinygg).await?;

    let payload = StatusPayload {
        title: view::TITLE,
        twitch,
        destinygg,
        delete_status: params
            .delete
            .filter(|status| status == "true" || status == "false"),
    };

    let html = view::render_index(&app_state.templates, &payload)?;
    Ok((jar, Html(html)))
}

async fn provider_status(
    app_state: &AppState,
    jar: CookieJar,
    kind: ProviderKind,
) -> Result<(CookieJar, ProviderStatus), Error> {
    let Some(token) = jar
        .get(app_state.cookie_name(kind))
        .map(|cookie| cookie.value().to_owned())
    else {
        return Ok((jar, ProviderStatus::default()));
    };

    let claims: SessionClaims = match app_state.session_keys.verify_for(&token, kind) {
        Ok(claims) => claims,
        Err(err) => {
            warn!("Clearing invalid {kind} session cookie: {err}");
            return Ok((
                jar.remove(removal_cookie(app_state, kind)),
                ProviderStatus::default(),
            ));
        }
    };

    let is_deleting =
        deletion_preference::is_deleting(app_state.preferences.as_ref(), &claims).await?;

    Ok((
        jar,
        ProviderStatus {
            name: claims.display_name,
            email: claims.email,
            logged_in: true,
            is_deleting,
        },
    ))
}
