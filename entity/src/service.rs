use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chat service a deletion preference applies to.
///
/// The stored tags are read by the log processors and must not change.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Deserialize, Serialize, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Service {
    #[sea_orm(string_value = "twtch")]
    Twitch,
    #[sea_orm(string_value = "destinygg")]
    Destinygg,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Twitch => write!(f, "Twitch"),
            Self::Destinygg => write!(f, "Destiny.gg"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn stored_tags_are_stable() {
        assert_eq!(Service::Twitch.to_value(), "twtch");
        assert_eq!(Service::Destinygg.to_value(), "destinygg");
        assert_eq!(
            Service::try_from_value(&"destinygg".to_string()).unwrap(),
            Service::Destinygg
        );
    }
}
