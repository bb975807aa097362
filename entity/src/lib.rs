//! SeaORM entity models for the spamguard moderation database.

pub mod mute_record;
pub mod review_record;

pub mod prelude {
    pub use super::mute_record::Entity as MuteRecord;
    pub use super::review_record::Entity as ReviewRecord;
}
