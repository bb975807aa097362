use crate::data::mute_record::MuteRecordRepository;
use crate::model::mute::UpsertMuteRecordParam;
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod upsert;
