use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::*;
use serde_json::json;

use domain::error::{
    AuthErrorKind, DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind,
    InternalErrorKind,
};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Web(WebErrorKind),
}

/// Failures that originate in the HTTP layer itself.
#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    Template(String),
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Domain(err) => write!(fmt, "{err}"),
            Error::Web(kind) => write!(fmt, "Web Error: {kind:?}"),
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let domain_error = match self {
            Error::Web(kind) => {
                error!("Web Error: {kind:?}");
                return (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                    .into_response();
            }
            Error::Domain(err) => err,
        };

        match domain_error.error_kind {
            DomainErrorKind::Auth(auth_error_kind) => match auth_error_kind {
                AuthErrorKind::InvalidState => unauthorized("Invalid state"),
                AuthErrorKind::InvalidSession => unauthorized("Invalid session"),
                AuthErrorKind::Unauthorized => unauthorized("Unauthorized"),
            },
            DomainErrorKind::Internal(internal_error_kind) => {
                match internal_error_kind {
                    InternalErrorKind::Entity(EntityErrorKind::NotFound) => {
                        warn!("Entity not found: {:?}", domain_error.source)
                    }
                    kind => error!("Internal Error {kind:?}: {:?}", domain_error.source),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
            DomainErrorKind::External(external_error_kind) => {
                match external_error_kind {
                    ExternalErrorKind::Network => {
                        warn!("Identity provider unreachable: {:?}", domain_error.source)
                    }
                    ExternalErrorKind::Provider(reason) => {
                        warn!("Identity provider error {reason}: {:?}", domain_error.source)
                    }
                }
                (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}
