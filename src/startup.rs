use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{config::Config, data::review_record::ReviewRecordRepository, error::AppError,
    tracking::TrackingStore};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Re-seeds the flagged-actor set from pending review records.
///
/// Flagged-set membership is tied to review record existence, so after a
/// restart every actor with an unresolved review must be flagged again or a
/// fresh burst from them would open a duplicate review.
///
/// # Arguments
/// - `db` - Database connection
/// - `store` - Tracking store to seed
///
/// # Returns
/// - `Ok(count)` - Number of actors flagged
/// - `Err(AppError)` - Database error reading pending reviews
pub async fn reseed_flagged(
    db: &DatabaseConnection,
    store: &TrackingStore,
) -> Result<usize, AppError> {
    let pending = ReviewRecordRepository::new(db).get_all().await?;
    let count = pending.len();

    for record in pending {
        let (Ok(realm_id), Ok(actor_id)) =
            (record.realm_id.parse::<u64>(), record.actor_id.parse::<u64>())
        else {
            tracing::warn!(
                "Skipping review record {} with unparseable ids",
                record.review_id
            );
            continue;
        };
        store.flag(realm_id, actor_id);
    }

    if count > 0 {
        info!("Re-flagged {} actor(s) with pending reviews", count);
    }

    Ok(count)
}
