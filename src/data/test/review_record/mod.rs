use crate::data::review_record::ReviewRecordRepository;
use crate::model::review::CreateReviewRecordParam;
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod claim;
mod create;
mod get_expired;
