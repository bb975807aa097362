use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MuteRecord::Table)
                    .if_not_exists()
                    .col(string(MuteRecord::ActorId))
                    .col(string(MuteRecord::RealmId))
                    .col(timestamp(MuteRecord::UnmuteAt).not_null())
                    .primary_key(
                        Index::create()
                            .col(MuteRecord::ActorId)
                            .col(MuteRecord::RealmId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the unmute scan
        manager
            .create_index(
                Index::create()
                    .name("idx_mute_record_unmute_at")
                    .table(MuteRecord::Table)
                    .col(MuteRecord::UnmuteAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_mute_record_unmute_at")
                    .table(MuteRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MuteRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MuteRecord {
    Table,
    ActorId,
    RealmId,
    UnmuteAt,
}
