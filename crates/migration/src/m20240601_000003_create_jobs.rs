use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(pk_auto(Jobs::Id))
                    .col(integer(Jobs::RequesterId).not_null())
                    .col(integer_null(Jobs::RunnerId))
                    .col(string_len(Jobs::Title, 255).not_null())
                    .col(text_null(Jobs::Description))
                    .col(string_len(Jobs::Category, 64).not_null())
                    .col(text(Jobs::PickupAddress).not_null())
                    .col(text(Jobs::DropoffAddress).not_null())
                    .col(decimal_len_null(Jobs::PickupLat, 10, 8))
                    .col(decimal_len_null(Jobs::PickupLng, 11, 8))
                    .col(decimal_len_null(Jobs::DropoffLat, 10, 8))
                    .col(decimal_len_null(Jobs::DropoffLng, 11, 8))
                    .col(decimal_len(Jobs::Price, 10, 2).not_null())
                    .col(string_len(Jobs::Status, 16).not_null().default("pending"))
                    .col(timestamp_with_time_zone(Jobs::CreatedAt).not_null().default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Jobs::CompletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_requester")
                            .from(Jobs::Table, Jobs::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_runner")
                            .from(Jobs::Table, Jobs::RunnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Jobs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    RequesterId,
    RunnerId,
    Title,
    Description,
    Category,
    PickupAddress,
    DropoffAddress,
    PickupLat,
    PickupLng,
    DropoffLat,
    DropoffLng,
    Price,
    Status,
    CreatedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
