use super::entities::{trip_subscription, user, TripSubscription, User};
use super::is_unique_violation;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct SubscriptionRepository {
    db: DatabaseConnection,
}

impl SubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn exists(&self, user_id: Uuid, trip_id: Uuid) -> Result<bool, DbErr> {
        let found = TripSubscription::find_by_id((user_id, trip_id))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    /// Inserts the (user, trip) pair unless it is already present. Returns true when a
    /// new subscription was created.
    pub async fn subscribe(&self, user_id: Uuid, trip_id: Uuid) -> Result<bool, DbErr> {
        if self.exists(user_id, trip_id).await? {
            return Ok(false);
        }

        let active = trip_subscription::ActiveModel {
            user_id: Set(user_id),
            trip_id: Set(trip_id),
            notified: Set(false),
            created_at: Set(Utc::now()),
        };
        match active.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(err) if is_unique_violation(&err) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn list_for_trip(&self, trip_id: Uuid) -> Result<Vec<trip_subscription::Model>, DbErr> {
        TripSubscription::find()
            .filter(trip_subscription::Column::TripId.eq(trip_id))
            .all(&self.db)
            .await
    }

    /// Subscribers of the trip that have not been notified yet.
    pub async fn pending_subscribers(&self, trip_id: Uuid) -> Result<Vec<user::Model>, DbErr> {
        let pending: Vec<Uuid> = TripSubscription::find()
            .filter(trip_subscription::Column::TripId.eq(trip_id))
            .filter(trip_subscription::Column::Notified.eq(false))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| s.user_id)
            .collect();

        if pending.is_empty() {
            return Ok(Vec::new());
        }

        User::find()
            .filter(user::Column::Id.is_in(pending))
            .all(&self.db)
            .await
    }

    pub async fn mark_notified(&self, user_id: Uuid, trip_id: Uuid) -> Result<(), DbErr> {
        TripSubscription::update_many()
            .col_expr(trip_subscription::Column::Notified, Expr::value(true))
            .filter(trip_subscription::Column::UserId.eq(user_id))
            .filter(trip_subscription::Column::TripId.eq(trip_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
