use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Row existence = the user opted out of log retention for that service.
        // The composite key keeps repeated opt-outs idempotent.
        manager
            .create_table(
                Table::create()
                    .table(DeletionPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeletionPreferences::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletionPreferences::Service)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletionPreferences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(DeletionPreferences::Name)
                            .col(DeletionPreferences::Service),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(DeletionPreferences::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum DeletionPreferences {
    Table,
    Name,
    Service,
    CreatedAt,
}
