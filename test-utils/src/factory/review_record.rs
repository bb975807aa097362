//! Review record factory for creating pending-review entities in tests.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test review records with customizable fields.
///
/// Defaults produce a review created "now" that expires in 12 hours, flagged
/// for a same-channel burst, with unique actor/realm/review IDs.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::review_record::ReviewRecordFactory;
///
/// let record = ReviewRecordFactory::new(&db)
///     .actor_id(42)
///     .expires_at(Utc::now() - Duration::minutes(5))
///     .build()
///     .await?;
/// ```
pub struct ReviewRecordFactory<'a> {
    db: &'a DatabaseConnection,
    review_id: String,
    actor_id: String,
    realm_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    pattern_kind: String,
}

impl<'a> ReviewRecordFactory<'a> {
    /// Creates a new factory with default values.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        let now = Utc::now();
        Self {
            db,
            review_id: (900_000 + id).to_string(),
            actor_id: (100_000 + id).to_string(),
            realm_id: "555000".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(12),
            pattern_kind: "same_channel".to_string(),
        }
    }

    /// Sets the review ID (the staff alert message ID).
    pub fn review_id(mut self, review_id: u64) -> Self {
        self.review_id = review_id.to_string();
        self
    }

    /// Sets the actor ID.
    pub fn actor_id(mut self, actor_id: u64) -> Self {
        self.actor_id = actor_id.to_string();
        self
    }

    /// Sets the realm (guild) ID.
    pub fn realm_id(mut self, realm_id: u64) -> Self {
        self.realm_id = realm_id.to_string();
        self
    }

    /// Sets the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the review deadline.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Sets the detected pattern kind.
    pub fn pattern_kind(mut self, pattern_kind: impl Into<String>) -> Self {
        self.pattern_kind = pattern_kind.into();
        self
    }

    /// Inserts the review record into the database.
    ///
    /// # Returns
    /// - `Ok(Model)` - The created review record
    /// - `Err(DbErr)` - Database error
    pub async fn build(self) -> Result<entity::review_record::Model, DbErr> {
        entity::review_record::ActiveModel {
            review_id: ActiveValue::Set(self.review_id),
            actor_id: ActiveValue::Set(self.actor_id),
            realm_id: ActiveValue::Set(self.realm_id),
            created_at: ActiveValue::Set(self.created_at),
            expires_at: ActiveValue::Set(self.expires_at),
            pattern_kind: ActiveValue::Set(self.pattern_kind),
        }
        .insert(self.db)
        .await
    }
}
