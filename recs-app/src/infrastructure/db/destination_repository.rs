use super::entities::{destination, Destination};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::*, query::*, Condition, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Column values for a destination insert.
#[derive(Debug, Clone, Default)]
pub struct NewDestination {
    pub name: String,
    pub display_name: Option<String>,
    pub country: Option<String>,
    pub kind: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub google_place_id: Option<String>,
}

#[derive(Clone)]
pub struct DestinationRepository {
    db: DatabaseConnection,
}

impl DestinationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_destination: NewDestination) -> Result<destination::Model, DbErr> {
        let active = destination::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_destination.name),
            display_name: Set(new_destination.display_name),
            country: Set(new_destination.country),
            kind: Set(new_destination.kind),
            latitude: Set(new_destination.latitude),
            longitude: Set(new_destination.longitude),
            google_place_id: Set(new_destination.google_place_id),
            place_data: Set(None),
            created_at: Set(Utc::now()),
        };
        active.insert(&self.db).await
    }

    /// Case-insensitive substring search over name, display name and country.
    pub async fn search(&self, query: &str, limit: u64) -> Result<Vec<destination::Model>, DbErr> {
        let pattern = format!("%{}%", query.trim().to_lowercase());
        let lowered = |column: destination::Column| Expr::expr(Func::lower(Expr::col(column)));

        Destination::find()
            .filter(
                Condition::any()
                    .add(lowered(destination::Column::Name).like(pattern.clone()))
                    .add(lowered(destination::Column::DisplayName).like(pattern.clone()))
                    .add(lowered(destination::Column::Country).like(pattern)),
            )
            .order_by_asc(destination::Column::Name)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<destination::Model>, DbErr> {
        Destination::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(destination::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(&self.db)
            .await
    }
}
