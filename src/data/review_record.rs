use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::model::review::CreateReviewRecordParam;

pub struct ReviewRecordRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReviewRecordRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending review record.
    ///
    /// # Arguments
    /// - `param`: Review identifiers and window boundaries
    ///
    /// # Returns
    /// - `Ok(Model)`: The created record
    /// - `Err(DbErr)`: Database error, including a unique violation when the
    ///   actor already has a pending review in the realm
    pub async fn create(
        &self,
        param: CreateReviewRecordParam,
    ) -> Result<entity::review_record::Model, DbErr> {
        entity::review_record::ActiveModel {
            review_id: ActiveValue::Set(param.review_id.to_string()),
            actor_id: ActiveValue::Set(param.actor_id.to_string()),
            realm_id: ActiveValue::Set(param.realm_id.to_string()),
            created_at: ActiveValue::Set(param.created_at),
            expires_at: ActiveValue::Set(param.expires_at),
            pattern_kind: ActiveValue::Set(param.pattern_kind),
        }
        .insert(self.db)
        .await
    }

    /// Gets a pending review by its ID (the staff alert message ID).
    pub async fn get_by_id(
        &self,
        review_id: u64,
    ) -> Result<Option<entity::review_record::Model>, DbErr> {
        entity::prelude::ReviewRecord::find_by_id(review_id.to_string())
            .one(self.db)
            .await
    }

    /// Gets all pending reviews, used to rebuild in-memory state at startup.
    pub async fn get_all(&self) -> Result<Vec<entity::review_record::Model>, DbErr> {
        entity::prelude::ReviewRecord::find().all(self.db).await
    }

    /// Gets pending reviews whose deadline has passed.
    ///
    /// # Arguments
    /// - `now`: Deadline cutoff
    ///
    /// # Returns
    /// - `Ok(records)`: Reviews with `expires_at <= now`
    /// - `Err(DbErr)`: Database error
    pub async fn get_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<entity::review_record::Model>, DbErr> {
        entity::prelude::ReviewRecord::find()
            .filter(entity::review_record::Column::ExpiresAt.lte(now))
            .all(self.db)
            .await
    }

    /// Deletes a pending review, claiming the right to resolve it.
    ///
    /// The delete is the synchronization point between concurrent resolvers:
    /// exactly one caller observes a deleted row and proceeds, every other
    /// caller sees the review as already resolved.
    ///
    /// # Arguments
    /// - `review_id`: Review to claim
    ///
    /// # Returns
    /// - `Ok(true)`: This caller claimed the review
    /// - `Ok(false)`: Someone else already resolved it
    /// - `Err(DbErr)`: Database error
    pub async fn claim(&self, review_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::ReviewRecord::delete_by_id(review_id.to_string())
            .exec(self.db)
            .await?;
        Ok(result.rows_affected == 1)
    }
}
