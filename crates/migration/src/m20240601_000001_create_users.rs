use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Email, 255).not_null().unique_key())
                    .col(text(Users::Password).not_null())
                    .col(string_len(Users::Role, 16).not_null().default("requester"))
                    .col(string_len(Users::FullName, 255).not_null())
                    .col(boolean(Users::IsVerified).not_null().default(false))
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null().default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Password,
    Role,
    FullName,
    IsVerified,
    CreatedAt,
}
