//! Signed, stateless session tokens.
//!
//! A session is an HS256 JWT holding [`SessionClaims`]. Nothing is kept
//! server side: a token is valid exactly when its signature matches the
//! configured secret and `exp` has not passed. Logging out only removes the
//! cookie.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use provider_auth::oauth::{ProviderKind, UserInfo};
use service::config::Config;
use std::time::Duration;

use crate::error::{AuthErrorKind, DomainErrorKind, Error};

pub use claims::SessionClaims;

mod claims;

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: SessionClaims,
    pub token: String,
}

/// Signing and verification keys for session tokens.
pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl Keys {
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            expiry,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret = config.jwt_secret().ok_or_else(|| {
            warn!("Failed to get JWT secret from config");
            Error::config("JWT_SECRET")
        })?;
        Ok(Self::new(
            secret.as_bytes(),
            Duration::from_secs(config.session_expiry_seconds),
        ))
    }

    /// How long an issued session stays valid.
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn issue(&self, user: &UserInfo, provider: ProviderKind) -> Result<Session, Error> {
        self.issue_at(user, provider, Utc::now())
    }

    /// Issue a session as if the current time were `now`.
    pub fn issue_at(
        &self,
        user: &UserInfo,
        provider: ProviderKind,
        now: DateTime<Utc>,
    ) -> Result<Session, Error> {
        let iat = now.timestamp();
        let exp = iat.saturating_add(i64::try_from(self.expiry.as_secs()).unwrap_or(i64::MAX));
        let claims = SessionClaims::new(user, provider, iat, exp);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        Ok(Session { claims, token })
    }

    /// Check signature and expiry and return the embedded claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, Error> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!("Rejecting session token: {err}");
                Error {
                    source: Some(Box::new(err)),
                    error_kind: DomainErrorKind::Auth(AuthErrorKind::InvalidSession),
                }
            })
    }

    /// Like [`Keys::verify`], additionally requiring the token to belong to `provider`.
    pub fn verify_for(&self, token: &str, provider: ProviderKind) -> Result<SessionClaims, Error> {
        let claims = self.verify(token)?;
        if claims.provider != provider {
            debug!(
                "Rejecting {} session presented for {}",
                claims.provider, provider
            );
            return Err(Error::auth(AuthErrorKind::InvalidSession));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn keys() -> Keys {
        Keys::new(b"test-secret", Duration::from_secs(3600))
    }

    fn bob() -> UserInfo {
        UserInfo {
            id: "u1".to_string(),
            login: "bob".to_string(),
            display_name: "Bob".to_string(),
            email: Some("bob@example.com".to_string()),
        }
    }

    fn is_invalid_session(err: &Error) -> bool {
        err.error_kind == DomainErrorKind::Auth(AuthErrorKind::InvalidSession)
    }

    #[test]
    fn token_is_valid_right_after_issuance() {
        let keys = keys();
        let session = keys.issue(&bob(), ProviderKind::Twitch).unwrap();

        let claims = keys.verify(&session.token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.display_name, "Bob");
        assert_eq!(claims.email.as_deref(), Some("bob@example.com"));
        assert_eq!(claims.provider, ProviderKind::Twitch);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims, session.claims);
    }

    #[test]
    fn token_is_invalid_after_expiry() {
        let keys = keys();
        let issued = Utc::now() - TimeDelta::seconds(3601);
        let session = keys.issue_at(&bob(), ProviderKind::Twitch, issued).unwrap();

        let err = keys.verify(&session.token).unwrap_err();
        assert!(is_invalid_session(&err));
    }

    #[test]
    fn mutating_any_byte_invalidates_token() {
        let keys = keys();
        let token = keys.issue(&bob(), ProviderKind::Destinygg).unwrap().token;

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(
                keys.verify(&tampered).is_err(),
                "tampered byte {i} still verified"
            );
        }
    }

    #[test]
    fn other_secret_and_garbage_are_rejected() {
        let token = keys().issue(&bob(), ProviderKind::Twitch).unwrap().token;
        let other = Keys::new(b"another-secret", Duration::from_secs(3600));

        assert!(is_invalid_session(&other.verify(&token).unwrap_err()));
        assert!(is_invalid_session(&keys().verify("not.a.jwt").unwrap_err()));
        assert!(is_invalid_session(&keys().verify("").unwrap_err()));
    }

    #[test]
    fn verify_for_rejects_other_provider() {
        let keys = keys();
        let token = keys.issue(&bob(), ProviderKind::Twitch).unwrap().token;

        assert!(keys.verify_for(&token, ProviderKind::Twitch).is_ok());
        let err = keys
            .verify_for(&token, ProviderKind::Destinygg)
            .unwrap_err();
        assert!(is_invalid_session(&err));
    }
}
