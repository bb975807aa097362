use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::model::mute::UpsertMuteRecordParam;

pub struct MuteRecordRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MuteRecordRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates or overwrites the mute record for an actor in a realm.
    ///
    /// An existing record's `unmute_at` is replaced, which is how a
    /// confirmation extends a mute applied at containment time.
    ///
    /// # Arguments
    /// - `param`: Actor, realm, and unmute time
    ///
    /// # Returns
    /// - `Ok(Model)`: The stored record
    /// - `Err(DbErr)`: Database error
    pub async fn upsert(
        &self,
        param: UpsertMuteRecordParam,
    ) -> Result<entity::mute_record::Model, DbErr> {
        entity::prelude::MuteRecord::insert(entity::mute_record::ActiveModel {
            actor_id: ActiveValue::Set(param.actor_id.to_string()),
            realm_id: ActiveValue::Set(param.realm_id.to_string()),
            unmute_at: ActiveValue::Set(param.unmute_at),
        })
        .on_conflict(
            OnConflict::columns([
                entity::mute_record::Column::ActorId,
                entity::mute_record::Column::RealmId,
            ])
            .update_columns([entity::mute_record::Column::UnmuteAt])
            .to_owned(),
        )
        .exec_with_returning(self.db)
        .await
    }

    /// Gets the mute record for an actor in a realm, if any.
    pub async fn get(
        &self,
        realm_id: u64,
        actor_id: u64,
    ) -> Result<Option<entity::mute_record::Model>, DbErr> {
        entity::prelude::MuteRecord::find_by_id((actor_id.to_string(), realm_id.to_string()))
            .one(self.db)
            .await
    }

    /// Deletes the mute record for an actor in a realm.
    pub async fn delete(&self, realm_id: u64, actor_id: u64) -> Result<(), DbErr> {
        entity::prelude::MuteRecord::delete_many()
            .filter(entity::mute_record::Column::ActorId.eq(actor_id.to_string()))
            .filter(entity::mute_record::Column::RealmId.eq(realm_id.to_string()))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
