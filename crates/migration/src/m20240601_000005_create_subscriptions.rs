use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscriptions::Id))
                    .col(integer(Subscriptions::UserId).not_null())
                    .col(string_len(Subscriptions::Plan, 16).not_null())
                    .col(string_len(Subscriptions::Status, 16).not_null().default("active"))
                    .col(timestamp_with_time_zone(Subscriptions::StartDate).not_null().default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Subscriptions::EndDate))
                    .col(decimal_len(Subscriptions::MonthlyPrice, 10, 2).not_null())
                    .col(integer(Subscriptions::ErrandsUsed).not_null().default(0))
                    .col(integer(Subscriptions::ErrandsLimit).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_user")
                            .from(Subscriptions::Table, Subscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscriptions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    Plan,
    Status,
    StartDate,
    EndDate,
    MonthlyPrice,
    ErrandsUsed,
    ErrandsLimit,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
