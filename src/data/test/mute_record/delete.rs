use super::*;

/// Tests deleting a mute record.
///
/// Expected: Ok with only the targeted (actor, realm) removed
#[tokio::test]
async fn deletes_only_the_targeted_mute() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::mute_record::MuteRecordFactory::new(db)
        .actor_id(7)
        .realm_id(1)
        .build()
        .await?;
    factory::mute_record::MuteRecordFactory::new(db)
        .actor_id(8)
        .realm_id(1)
        .build()
        .await?;

    let repo = MuteRecordRepository::new(db);
    repo.delete(1, 7).await?;

    assert!(repo.get(1, 7).await?.is_none());
    assert!(repo.get(1, 8).await?.is_some());

    Ok(())
}

/// Tests that deleting a missing record is a no-op.
///
/// Expected: Ok(())
#[tokio::test]
async fn deleting_missing_record_is_a_no_op() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    MuteRecordRepository::new(db).delete(1, 7).await?;

    Ok(())
}
