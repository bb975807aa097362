use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create table
        manager
            .create_table(
                Table::create()
                    .table(ReviewRecord::Table)
                    .if_not_exists()
                    .col(string(ReviewRecord::ReviewId).primary_key())
                    .col(string(ReviewRecord::ActorId))
                    .col(string(ReviewRecord::RealmId))
                    .col(timestamp(ReviewRecord::CreatedAt).not_null())
                    .col(timestamp(ReviewRecord::ExpiresAt).not_null())
                    .col(string(ReviewRecord::PatternKind).not_null())
                    .to_owned(),
            )
            .await?;

        // Index for the reconciliation loop's expiry scan
        manager
            .create_index(
                Index::create()
                    .name("idx_review_record_expires_at")
                    .table(ReviewRecord::Table)
                    .col(ReviewRecord::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // One active review per actor per guild
        manager
            .create_index(
                Index::create()
                    .name("idx_review_record_actor_realm")
                    .table(ReviewRecord::Table)
                    .col(ReviewRecord::ActorId)
                    .col(ReviewRecord::RealmId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes first
        manager
            .drop_index(
                Index::drop()
                    .name("idx_review_record_actor_realm")
                    .table(ReviewRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_review_record_expires_at")
                    .table(ReviewRecord::Table)
                    .to_owned(),
            )
            .await?;

        // Drop table
        manager
            .drop_table(Table::drop().table(ReviewRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ReviewRecord {
    Table,
    ReviewId,
    ActorId,
    RealmId,
    CreatedAt,
    ExpiresAt,
    PatternKind,
}
