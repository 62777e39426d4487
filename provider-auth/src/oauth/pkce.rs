//! PKCE (Proof Key for Code Exchange) support for OAuth 2.0.
//!
//! Verifiers follow RFC 7636; the challenge is the secret-bound variant
//! Destiny.gg expects rather than the plain S256 transform.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use rand::Rng;
use sha2::{Digest, Sha256};

/// PKCE code verifier (random string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceVerifier(String);

impl PkceVerifier {
    /// Generate a new random PKCE verifier.
    ///
    /// Creates a cryptographically random string of 43 characters.
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        let verifier = URL_SAFE_NO_PAD.encode(random_bytes);
        Self(verifier)
    }

    /// Create a PKCE verifier from an existing string.
    pub fn from_string(verifier: String) -> Self {
        Self(verifier)
    }

    /// Get the verifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// PKCE code challenge, a deterministic transform of the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge(String);

impl PkceChallenge {
    /// Create a code challenge bound to the client secret.
    ///
    /// Destiny.gg computes `base64(hex(sha256(verifier + hex(sha256(secret)))))`
    /// on its side and compares it with the challenge sent at authorize time.
    pub fn with_client_secret(verifier: &PkceVerifier, client_secret: &str) -> Self {
        let secret_digest = hex::encode(Sha256::digest(client_secret.as_bytes()));

        let mut hasher = Sha256::new();
        hasher.update(verifier.as_str().as_bytes());
        hasher.update(secret_digest.as_bytes());
        let hash = hex::encode(hasher.finalize());

        Self(STANDARD.encode(hash))
    }

    /// Get the challenge string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkce_verifier_generation() {
        let verifier = PkceVerifier::generate();
        assert_eq!(verifier.as_str().len(), 43);
        assert_ne!(verifier, PkceVerifier::generate());
    }

    #[test]
    fn test_pkce_verifier_is_url_safe() {
        let verifier = PkceVerifier::generate();
        assert!(verifier
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_secret_bound_challenge_is_base64_of_hex_digest() {
        let verifier = PkceVerifier::from_string("test_verifier".to_string());
        let challenge = PkceChallenge::with_client_secret(&verifier, "secret");

        let decoded = STANDARD.decode(challenge.as_str()).unwrap();
        let hex_digest = String::from_utf8(decoded).unwrap();
        assert_eq!(hex_digest.len(), 64);
        assert!(hex_digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_secret_bound_challenge_depends_on_secret_and_verifier() {
        let verifier = PkceVerifier::from_string("test_verifier".to_string());
        let other = PkceVerifier::from_string("other_verifier".to_string());

        let a = PkceChallenge::with_client_secret(&verifier, "secret");
        assert_eq!(a, PkceChallenge::with_client_secret(&verifier, "secret"));
        assert_ne!(a, PkceChallenge::with_client_secret(&verifier, "another"));
        assert_ne!(a, PkceChallenge::with_client_secret(&other, "secret"));
    }
}
