use super::*;

/// Tests inserting a fresh mute record.
///
/// Expected: Ok with record created
#[tokio::test]
async fn creates_mute_record() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let unmute_at = Utc::now() + Duration::days(1);
    let repo = MuteRecordRepository::new(db);
    let record = repo
        .upsert(UpsertMuteRecordParam {
            actor_id: 7,
            realm_id: 1,
            unmute_at,
        })
        .await?;

    assert_eq!(record.actor_id, "7");
    assert_eq!(record.realm_id, "1");
    assert_eq!(record.unmute_at, unmute_at);

    Ok(())
}

/// Tests that upserting an existing (actor, realm) overwrites `unmute_at`.
///
/// This is how a confirmation extends a mute applied at containment time.
///
/// Expected: Ok with the later unmute time stored, single record
#[tokio::test]
async fn overwrites_existing_unmute_time() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = MuteRecordRepository::new(db);
    repo.upsert(UpsertMuteRecordParam {
        actor_id: 7,
        realm_id: 1,
        unmute_at: now + Duration::hours(1),
    })
    .await?;

    let extended = now + Duration::days(1);
    repo.upsert(UpsertMuteRecordParam {
        actor_id: 7,
        realm_id: 1,
        unmute_at: extended,
    })
    .await?;

    let record = repo.get(1, 7).await?.expect("record should exist");
    assert_eq!(record.unmute_at, extended);

    Ok(())
}

/// Tests that the same actor muted in two realms gets two records.
///
/// Expected: Ok with independent records per realm
#[tokio::test]
async fn mutes_are_scoped_per_realm() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_moderation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let unmute_at = Utc::now() + Duration::days(1);
    let repo = MuteRecordRepository::new(db);
    for realm_id in [1, 2] {
        repo.upsert(UpsertMuteRecordParam {
            actor_id: 7,
            realm_id,
            unmute_at,
        })
        .await?;
    }

    assert!(repo.get(1, 7).await?.is_some());
    assert!(repo.get(2, 7).await?.is_some());

    Ok(())
}
