use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use axum_extra::extract::CookieJar;
use domain::error::{AuthErrorKind, Error as DomainError};
use domain::ProviderKind;
use log::*;

use crate::cookie::removal_cookie;
use crate::{AppState, Error};

/// Admits requests carrying a valid session cookie for the route's provider.
///
/// The verified `SessionClaims` are placed in the request extensions. A
/// missing cookie is answered with 401; a cookie that fails verification is
/// cleared as well, so the browser never presents it again.
pub async fn require_session(
    State(app_state): State<AppState>,
    Extension(kind): Extension<ProviderKind>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = jar
        .get(app_state.cookie_name(kind))
        .map(|cookie| cookie.value().to_owned())
    else {
        debug!("No {kind} session on {}", request.uri().path());
        return Error::from(DomainError::auth(AuthErrorKind::Unauthorized)).into_response();
    };

    match app_state.session_keys.verify_for(&token, kind) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            warn!(
                "Clearing invalid {kind} session presented to {}",
                request.uri().path()
            );
            let jar = jar.remove(removal_cookie(&app_state, kind));
            (jar, Error::from(err)).into_response()
        }
    }
}
