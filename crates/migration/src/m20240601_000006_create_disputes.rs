use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Disputes::Table)
                    .if_not_exists()
                    .col(pk_auto(Disputes::Id))
                    .col(integer(Disputes::JobId).not_null())
                    .col(integer(Disputes::ReporterId).not_null())
                    .col(text(Disputes::Reason).not_null())
                    .col(text_null(Disputes::Description))
                    .col(string_len(Disputes::Status, 16).not_null().default("open"))
                    .col(text_null(Disputes::Resolution))
                    .col(timestamp_with_time_zone(Disputes::CreatedAt).not_null().default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(Disputes::ResolvedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disputes_job")
                            .from(Disputes::Table, Disputes::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disputes_reporter")
                            .from(Disputes::Table, Disputes::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Disputes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Disputes {
    Table,
    Id,
    JobId,
    ReporterId,
    Reason,
    Description,
    Status,
    Resolution,
    CreatedAt,
    ResolvedAt,
}

#[derive(DeriveIden)]
enum Jobs { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
