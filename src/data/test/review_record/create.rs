use super::*;

/// Tests creating a pending review record.
///
/// Verifies that numeric IDs are stored as strings and the record can be
/// read back by its review ID.
///
/// Expected: Ok with record created
#[tokio::test]
async fn creates_review_record() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = ReviewRecordRepository::new(db);
    let record = repo
        .create(CreateReviewRecordParam {
            review_id: 500,
            actor_id: 7,
            realm_id: 1,
            created_at: now,
            expires_at: now + Duration::hours(12),
            pattern_kind: "multiple_channels".to_string(),
        })
        .await?;

    assert_eq!(record.review_id, "500");
    assert_eq!(record.actor_id, "7");
    assert_eq!(record.realm_id, "1");
    assert_eq!(record.pattern_kind, "multiple_channels");

    let found = repo.get_by_id(500).await?;
    assert_eq!(found, Some(record));

    Ok(())
}

/// Tests looking up a review that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn get_by_id_returns_none_for_unknown_review() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ReviewRecordRepository::new(db);
    assert_eq!(repo.get_by_id(12345).await?, None);

    Ok(())
}
