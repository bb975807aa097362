//! Entity factories for tests.
//!
//! Each factory creates one entity with sensible defaults that individual
//! tests can override through a builder interface.

pub mod helpers;
pub mod mute_record;
pub mod review_record;
