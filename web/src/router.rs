use crate::controller::{deletion_controller, index_controller, oauth_controller};
use crate::middleware::session::require_session;
use crate::AppState;
use axum::http::StatusCode;
use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};
use domain::ProviderKind;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

pub fn define_routes(app_state: AppState) -> Router {
    let request_timeout = Duration::from_secs(app_state.config.request_timeout_seconds);
    let router = Router::new()
        .merge(index_routes(app_state.clone()))
        .nest_service("/assets", static_routes(&app_state));

    // Each provider gets the same routes under its own prefix, e.g. /twitch and /dgg.
    ProviderKind::ALL
        .into_iter()
        .fold(router, |router, kind| {
            router.nest(
                &format!("/{}", kind.path_segment()),
                provider_routes(app_state.clone(), kind),
            )
        })
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}

fn index_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_controller::index))
        .with_state(app_state)
}

fn provider_routes(app_state: AppState, kind: ProviderKind) -> Router {
    Router::new()
        .route("/delete", get(deletion_controller::delete))
        .route("/undelete", get(deletion_controller::undelete))
        // Only the routes above require a session.
        .route_layer(from_fn_with_state(app_state.clone(), require_session))
        .route("/login", get(oauth_controller::login))
        .route("/callback", get(oauth_controller::callback))
        .route("/logout", get(oauth_controller::logout))
        .layer(Extension(kind))
        .with_state(app_state)
}

fn static_routes(app_state: &AppState) -> ServeDir {
    ServeDir::new(app_state.config.assets_dir())
}
