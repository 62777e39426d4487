use crate::service::Service;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user who asked for their chat logs to be excluded from retention.
/// Row existence is the preference; there is no flag column.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deletion_preferences")]
pub struct Model {
    /// Login name the user's chat lines are recorded under.
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub service: Service,
    #[serde(skip_deserializing)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
