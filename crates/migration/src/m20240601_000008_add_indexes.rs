use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Runners: lookup by user and the pending-verification queue
        manager
            .create_index(Index::create().name("idx_runners_user").table(Runners::Table).col(Runners::UserId).to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_runners_verification_status")
                    .table(Runners::Table)
                    .col(Runners::VerificationStatus)
                    .to_owned(),
            )
            .await?;

        // Jobs: status filter and recent-first listing
        manager
            .create_index(Index::create().name("idx_jobs_status").table(Jobs::Table).col(Jobs::Status).to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_jobs_created_at").table(Jobs::Table).col(Jobs::CreatedAt).to_owned())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user_status")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .col(Subscriptions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(Index::create().name("idx_disputes_status").table(Disputes::Table).col(Disputes::Status).to_owned())
            .await?;

        manager
            .create_index(Index::create().name("idx_analytics_date").table(Analytics::Table).col(Analytics::Date).to_owned())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_runners_user").table(Runners::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_runners_verification_status").table(Runners::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_status").table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_created_at").table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscriptions_user_status").table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_disputes_status").table(Disputes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_analytics_date").table(Analytics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Runners { Table, UserId, VerificationStatus }

#[derive(DeriveIden)]
enum Jobs { Table, Status, CreatedAt }

#[derive(DeriveIden)]
enum Subscriptions { Table, UserId, Status }

#[derive(DeriveIden)]
enum Disputes { Table, Status }

#[derive(DeriveIden)]
enum Analytics { Table, Date }
