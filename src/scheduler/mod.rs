//! Cron jobs for background reconciliation.
//!
//! Each job has a directly-callable `run_once` body so tests drive it with a
//! controlled clock; the `start_scheduler` functions only wire the body into
//! a cron schedule.

pub mod review_expiry;
pub mod tracking_sweep;
