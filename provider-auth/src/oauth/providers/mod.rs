//! Identity provider implementations.

pub mod destinygg;
pub mod twitch;

use log::*;
use serde::de::DeserializeOwned;

use crate::error::{oauth_error, Error, ErrorKind, OAuthErrorKind};

/// Wrap a transport failure while talking to a provider.
fn network_error(err: reqwest::Error) -> Error {
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::OAuth(OAuthErrorKind::Network),
    }
}

/// Decode a provider response, treating any non-2xx status as `failure`.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    failure: OAuthErrorKind,
    endpoint: &str,
) -> Result<T, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{} responded with {}: {}", endpoint, status, body);
        return Err(oauth_error(
            failure,
            &format!("{endpoint} responded with {status}"),
        ));
    }

    response.json::<T>().await.map_err(|e| {
        warn!("Failed to parse {} response: {:?}", endpoint, e);
        Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
        }
    })
}

/// Build a URL with encoded query parameters.
fn url_with_params(base: &str, params: &[(&str, &str)]) -> Result<String, Error> {
    url::Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::AuthorizationFailed),
        })
}
