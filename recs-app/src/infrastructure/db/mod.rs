pub mod entities;
mod activity_repository;
mod auth_token_repository;
mod destination_repository;
mod recommendation_repository;
mod subscription_repository;
mod trip_repository;
mod user_repository;

pub use activity_repository::ActivityRepository;
pub use auth_token_repository::AuthTokenRepository;
pub use destination_repository::{DestinationRepository, NewDestination};
pub use recommendation_repository::{NewRecommendation, RecommendationRepository};
pub use subscription_repository::SubscriptionRepository;
pub use trip_repository::{NewTrip, TripRepository};
pub use user_repository::UserRepository;

use entities::{Activity, AuthToken, Destination, Recommendation, Trip, TripSubscription, User};
use sea_orm::sea_query::Table;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use std::time::Duration;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    // Every pooled connection to `sqlite::memory:` opens its own empty database.
    if database_url.contains(":memory:") {
        opt.max_connections(1);
    }

    Database::connect(opt).await
}

/// Creates every table that does not exist yet, parents before children.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, User).await?;
    create_table(db, Destination).await?;
    create_table(db, Trip).await?;
    create_table(db, Activity).await?;
    create_table(db, AuthToken).await?;
    create_table(db, Recommendation).await?;
    create_table(db, TripSubscription).await?;
    tracing::debug!("Database schema is up to date");
    Ok(())
}

/// Drops all tables and recreates them empty.
pub async fn reset_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    drop_table(db, TripSubscription).await?;
    drop_table(db, Recommendation).await?;
    drop_table(db, AuthToken).await?;
    drop_table(db, Activity).await?;
    drop_table(db, Trip).await?;
    drop_table(db, Destination).await?;
    drop_table(db, User).await?;
    run_migrations(db).await
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

async fn drop_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let statement = Table::drop().table(entity).if_exists().to_owned();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// True when the error comes from a unique or primary-key constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
