//! Mute record factory for creating active-mute entities in tests.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test mute records with customizable fields.
///
/// Defaults produce a mute expiring in one day for unique actor/realm IDs.
pub struct MuteRecordFactory<'a> {
    db: &'a DatabaseConnection,
    actor_id: String,
    realm_id: String,
    unmute_at: DateTime<Utc>,
}

impl<'a> MuteRecordFactory<'a> {
    /// Creates a new factory with default values.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            actor_id: (100_000 + id).to_string(),
            realm_id: "555000".to_string(),
            unmute_at: Utc::now() + Duration::days(1),
        }
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

    /// Sets the unmute deadline.
    pub fn unmute_at(mut self, unmute_at: DateTime<Utc>) -> Self {
        self.unmute_at = unmute_at;
        self
    }

    /// Inserts the mute record into the database.
    ///
    /// # Returns
    /// - `Ok(Model)` - The created mute record
    /// - `Err(DbErr)` - Database error
    pub async fn build(self) -> Result<entity::mute_record::Model, DbErr> {
        entity::mute_record::ActiveModel {
            actor_id: ActiveValue::Set(self.actor_id),
            realm_id: ActiveValue::Set(self.realm_id),
            unmute_at: ActiveValue::Set(self.unmute_at),
        }
        .insert(self.db)
        .await
    }
}
