//! Business logic layer for escalation and review.
//!
//! Services orchestrate the tracking store, the repositories, and the
//! moderation gateway. All Discord side effects go through the
//! [`gateway::ModerationGateway`] trait so the logic is testable against a
//! recording fake.

pub mod alert;
pub mod confirmation;
pub mod escalation;
pub mod gateway;
pub mod retry;
pub mod review;

#[cfg(test)]
pub mod testing;
