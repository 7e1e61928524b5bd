use super::entities::{recommendation, trip, trip_subscription, Recommendation, Trip, TripSubscription};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

/// Column values for a trip insert; slug and share token must already be unique.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub destination: String,
    pub traveler_name: String,
    pub share_token: String,
    pub slug: String,
    pub user_id: Uuid,
    pub destination_id: Option<Uuid>,
    pub destination_display_name: Option<String>,
    pub destination_country: Option<String>,
    pub destination_info: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct TripRepository {
    db: DatabaseConnection,
}

impl TripRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_trip: NewTrip) -> Result<trip::Model, DbErr> {
        let now = Utc::now();
        let active = trip::ActiveModel {
            id: Set(Uuid::new_v4()),
            destination: Set(new_trip.destination),
            traveler_name: Set(new_trip.traveler_name),
            share_token: Set(new_trip.share_token),
            slug: Set(new_trip.slug),
            user_id: Set(new_trip.user_id),
            destination_id: Set(new_trip.destination_id),
            destination_display_name: Set(new_trip.destination_display_name),
            destination_country: Set(new_trip.destination_country),
            destination_info: Set(new_trip.destination_info),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<trip::Model>, DbErr> {
        Trip::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<trip::Model>, DbErr> {
        Trip::find()
            .filter(trip::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    pub async fn find_by_share_token(&self, token: &str) -> Result<Option<trip::Model>, DbErr> {
        Trip::find()
            .filter(trip::Column::ShareToken.eq(token))
            .one(&self.db)
            .await
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DbErr> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    pub async fn share_token_exists(&self, token: &str) -> Result<bool, DbErr> {
        Ok(self.find_by_share_token(token).await?.is_some())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<trip::Model>, DbErr> {
        Trip::find()
            .filter(trip::Column::UserId.eq(user_id))
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<trip::Model>, DbErr> {
        Trip::find()
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes the trip with its recommendations and subscriptions in one transaction.
    /// Activities and users are left alone.
    pub async fn delete_with_dependents(&self, trip_id: Uuid) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        Recommendation::delete_many()
            .filter(recommendation::Column::TripId.eq(trip_id))
            .exec(&txn)
            .await?;
        TripSubscription::delete_many()
            .filter(trip_subscription::Column::TripId.eq(trip_id))
            .exec(&txn)
            .await?;
        let deleted = Trip::delete_by_id(trip_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(deleted.rows_affected == 1)
    }
}
