//! Database repository layer for review and mute records.
//!
//! Repositories wrap all SeaORM queries for a single entity and return entity
//! models to the service layer. Snowflake IDs are stored as strings and
//! converted at this boundary.

pub mod mute_record;
pub mod review_record;

#[cfg(test)]
mod test;
