//! Claims carried by a session token.

use provider_auth::oauth::{ProviderKind, UserInfo};
use serde::{Deserialize, Serialize};

/// Identity embedded in a session cookie.
///
/// `name` is the login handle chat logs are recorded under and is the key
/// deletion preferences are stored by. `email` is only ever populated for
/// Twitch sessions; Destiny.gg does not expose one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub provider: ProviderKind,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub(crate) fn new(user: &UserInfo, provider: ProviderKind, iat: i64, exp: i64) -> Self {
        Self {
            sub: user.id.clone(),
            name: user.login.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            provider,
            iat,
            exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_omitted_when_absent() {
        let user = UserInfo {
            id: "42".to_string(),
            login: "bob".to_string(),
            display_name: "bob".to_string(),
            email: None,
        };
        let claims = SessionClaims::new(&user, ProviderKind::Destinygg, 10, 20);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["provider"], "destinygg");
        assert!(json.get("email").is_none());

        let parsed: SessionClaims = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, claims);
    }
}
