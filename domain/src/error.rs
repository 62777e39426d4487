//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use provider_auth::error::{
    Error as ProviderAuthError, ErrorKind as ProviderAuthErrorKind, OAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error that caused
/// the domain error. `web` maps the `error_kind`s to HTTP responses and never
/// depends on `entity_api` or `provider_auth` error types directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Auth(AuthErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Entity errors reduced to what the `domain` layer cares about.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Other(String),
}

/// Failures talking to an identity provider. None of them are retried.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Provider(String),
}

/// Failures that end with the user logged out.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// The callback `state` was absent, unknown, expired or already used.
    InvalidState,
    /// A session token failed signature, format or expiry checks.
    InvalidSession,
    /// A protected route was hit without a session.
    Unauthorized,
}

impl Error {
    pub fn auth(kind: AuthErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Auth(kind),
        }
    }

    pub fn config(missing: &str) -> Self {
        Error {
            source: Some(format!("missing configuration value: {missing}").into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }

    pub fn provider(reason: &str) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Provider(reason.to_string())),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self.error_kind, DomainErrorKind::Auth(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {:?}", self.error_kind)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            _ => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<ProviderAuthError> for Error {
    fn from(err: ProviderAuthError) -> Self {
        let error_kind = match &err.error_kind {
            ProviderAuthErrorKind::OAuth(OAuthErrorKind::InvalidState) => {
                DomainErrorKind::Auth(AuthErrorKind::InvalidState)
            }
            ProviderAuthErrorKind::OAuth(OAuthErrorKind::Network) => {
                DomainErrorKind::External(ExternalErrorKind::Network)
            }
            ProviderAuthErrorKind::OAuth(kind) => {
                DomainErrorKind::External(ExternalErrorKind::Provider(format!("{kind:?}")))
            }
            ProviderAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JWT encoding related error".to_string(),
            )),
        }
    }
}
