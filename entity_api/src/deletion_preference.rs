use super::error::Error;
use entity::deletion_preferences::{ActiveModel, Column, Entity};
use entity::service::Service;
use log::debug;
use sea_orm::{entity::prelude::*, sea_query::OnConflict, ActiveValue::Set, DatabaseConnection};

/// Records that `name`'s logs on `service` should be excluded. Adding an
/// existing preference is a no-op.
pub async fn add(db: &DatabaseConnection, name: &str, service: Service) -> Result<(), Error> {
    debug!("Adding deletion preference for {name} on {service}");

    let active_model = ActiveModel {
        name: Set(name.to_string()),
        service: Set(service),
        created_at: Set(chrono::Utc::now().into()),
    };

    Entity::insert(active_model)
        .on_conflict(
            OnConflict::columns([Column::Name, Column::Service])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Removes the preference if present. Removing an absent preference is a no-op.
pub async fn delete(db: &DatabaseConnection, name: &str, service: Service) -> Result<(), Error> {
    debug!("Removing deletion preference for {name} on {service}");

    Entity::delete_many()
        .filter(Column::Name.eq(name))
        .filter(Column::Service.eq(service))
        .exec(db)
        .await?;

    Ok(())
}

pub async fn exists(db: &DatabaseConnection, name: &str, service: Service) -> Result<bool, Error> {
    Ok(Entity::find_by_id((name.to_string(), service))
        .one(db)
        .await?
        .is_some())
}
