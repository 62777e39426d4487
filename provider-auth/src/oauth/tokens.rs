//! OAuth token types.

use secrecy::SecretString;

/// Access token returned by a provider's token endpoint.
///
/// Only used for the identity lookup that follows the exchange; nothing is
/// refreshed or persisted.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access_token: SecretString,
}

impl Tokens {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token: SecretString::new(access_token),
        }
    }
}
