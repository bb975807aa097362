mod mute_record;
mod review_record;
