//! Domain models and repository parameter types.
//!
//! These types sit between the event handlers, the in-memory tracking state,
//! and the data layer. Repository methods take parameter structs rather than
//! long argument lists, keeping the call sites readable and the data layer
//! independent of serenity types.

pub mod activity;
pub mod mute;
pub mod review;
