use super::*;

/// Tests that the first claim deletes the record and wins.
///
/// Expected: first claim true, record gone
#[tokio::test]
async fn first_claim_wins() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::review_record::ReviewRecordFactory::new(db)
        .review_id(500)
        .build()
        .await?;

    let repo = ReviewRecordRepository::new(db);
    assert!(repo.claim(500).await?);
    assert_eq!(repo.get_by_id(500).await?, None);

    Ok(())
}

/// Tests that a second claim observes the review as already resolved.
///
/// Expected: second claim false
#[tokio::test]
async fn second_claim_loses() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::review_record::ReviewRecordFactory::new(db)
        .review_id(500)
        .build()
        .await?;

    let repo = ReviewRecordRepository::new(db);
    assert!(repo.claim(500).await?);
    assert!(!repo.claim(500).await?);

    Ok(())
}

/// Tests claiming a review that never existed.
///
/// Expected: false
#[tokio::test]
async fn claim_of_unknown_review_loses() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ReviewRecordRepository::new(db);
    assert!(!repo.claim(12345).await?);

    Ok(())
}
