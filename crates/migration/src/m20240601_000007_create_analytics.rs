use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Analytics::Table)
                    .if_not_exists()
                    .col(pk_auto(Analytics::Id))
                    .col(timestamp_with_time_zone(Analytics::Date).not_null().default(Expr::current_timestamp()))
                    .col(integer(Analytics::TotalJobs).not_null().default(0))
                    .col(integer(Analytics::CompletedJobs).not_null().default(0))
                    .col(integer(Analytics::ActiveRunners).not_null().default(0))
                    .col(decimal_len(Analytics::Revenue, 10, 2).not_null().default(0))
                    .col(integer(Analytics::Disputes).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Analytics::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Analytics {
    Table,
    Id,
    Date,
    TotalJobs,
    CompletedJobs,
    ActiveRunners,
    Revenue,
    Disputes,
}
