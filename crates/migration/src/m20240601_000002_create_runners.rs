use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Runners::Table)
                    .if_not_exists()
                    .col(pk_auto(Runners::Id))
                    .col(integer(Runners::UserId).not_null())
                    .col(string_len_null(Runners::NationalId, 64))
                    .col(string_len_null(Runners::Phone, 32))
                    .col(string_len_null(Runners::DateOfBirth, 32))
                    .col(string_len(Runners::VerificationStatus, 16).not_null().default("pending"))
                    .col(boolean(Runners::DocumentsUploaded).not_null().default(false))
                    .col(boolean(Runners::BackgroundCheckPassed).not_null().default(false))
                    .col(boolean(Runners::VehicleVerified).not_null().default(false))
                    .col(timestamp_with_time_zone(Runners::CreatedAt).not_null().default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_runners_user")
                            .from(Runners::Table, Runners::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Runners::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Runners {
    Table,
    Id,
    UserId,
    NationalId,
    Phone,
    DateOfBirth,
    VerificationStatus,
    DocumentsUploaded,
    BackgroundCheckPassed,
    VehicleVerified,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
