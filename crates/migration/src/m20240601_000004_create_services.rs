use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(pk_auto(Services::Id))
                    .col(string_len(Services::Name, 255).not_null())
                    .col(text_null(Services::Description))
                    .col(string_len(Services::Category, 64).not_null())
                    .col(decimal_len(Services::BasePrice, 10, 2).not_null())
                    .col(decimal_len_null(Services::PricePerKm, 10, 2))
                    .col(boolean(Services::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Services::CreatedAt).not_null().default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Name,
    Description,
    Category,
    BasePrice,
    PricePerKm,
    IsActive,
    CreatedAt,
}
