use super::*;

/// Tests that only reviews past their deadline are returned.
///
/// Creates one expired and one live review and verifies the expired query
/// returns exactly the former while `get_all` sees both.
///
/// Expected: Ok with the expired record only
#[tokio::test]
async fn returns_only_expired_reviews() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let expired = factory::review_record::ReviewRecordFactory::new(db)
        .expires_at(now - Duration::minutes(5))
        .build()
        .await?;
    factory::review_record::ReviewRecordFactory::new(db)
        .expires_at(now + Duration::hours(11))
        .build()
        .await?;

    let repo = ReviewRecordRepository::new(db);

    let found = repo.get_expired(now).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].review_id, expired.review_id);

    assert_eq!(repo.get_all().await?.len(), 2);

    Ok(())
}

/// Tests the boundary: a deadline exactly at `now` counts as expired.
///
/// Expected: Ok with the record returned
#[tokio::test]
async fn deadline_at_now_is_expired() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    factory::review_record::ReviewRecordFactory::new(db)
        .expires_at(now)
        .build()
        .await?;

    let repo = ReviewRecordRepository::new(db);
    assert_eq!(repo.get_expired(now).await?.len(), 1);

    Ok(())
}
