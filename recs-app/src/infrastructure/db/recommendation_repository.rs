use super::entities::{activity, recommendation, user, Activity, Recommendation, User};
use crate::domain::TripRecommendation;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use std::collections::HashMap;
use uuid::Uuid;

/// One row of a batch insert; trip and author are shared by the batch.
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub activity_id: Uuid,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct RecommendationRepository {
    db: DatabaseConnection,
}

impl RecommendationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        trip_id: Uuid,
        activity_id: Uuid,
        author_id: Uuid,
        description: Option<String>,
    ) -> Result<recommendation::Model, DbErr> {
        let now = Utc::now();
        let active = recommendation::ActiveModel {
            id: Set(Uuid::new_v4()),
            activity_id: Set(activity_id),
            author_id: Set(author_id),
            trip_id: Set(trip_id),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(&self.db).await
    }

    /// Inserts the whole batch in one transaction: either every row is stored or none.
    pub async fn create_batch(
        &self,
        trip_id: Uuid,
        author_id: Uuid,
        batch: Vec<NewRecommendation>,
    ) -> Result<Vec<recommendation::Model>, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let mut created = Vec::with_capacity(batch.len());
        for row in batch {
            let active = recommendation::ActiveModel {
                id: Set(Uuid::new_v4()),
                activity_id: Set(row.activity_id),
                author_id: Set(author_id),
                trip_id: Set(trip_id),
                description: Set(row.description),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(active.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<recommendation::Model>, DbErr> {
        Recommendation::find_by_id(id).one(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = Recommendation::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected == 1)
    }

    pub async fn list_for_trip(&self, trip_id: Uuid) -> Result<Vec<recommendation::Model>, DbErr> {
        Recommendation::find()
            .filter(recommendation::Column::TripId.eq(trip_id))
            .order_by_asc(recommendation::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<recommendation::Model>, DbErr> {
        Recommendation::find()
            .order_by_desc(recommendation::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Recommendations of a trip joined with their activity and author.
    pub async fn list_with_details(&self, trip_id: Uuid) -> Result<Vec<TripRecommendation>, DbErr> {
        let rows = self.list_for_trip(trip_id).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let activity_ids: Vec<Uuid> = rows.iter().map(|r| r.activity_id).collect();
        let author_ids: Vec<Uuid> = rows.iter().map(|r| r.author_id).collect();

        let activities: HashMap<Uuid, activity::Model> = Activity::find()
            .filter(activity::Column::Id.is_in(activity_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let authors: HashMap<Uuid, user::Model> = User::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let details = rows
            .into_iter()
            .filter_map(|r| {
                let activity = activities.get(&r.activity_id)?;
                Some(TripRecommendation {
                    id: r.id,
                    activity_id: activity.id,
                    activity_name: activity.name.clone(),
                    category: activity.category.clone(),
                    website_url: activity.website_url.clone(),
                    address: activity.address.clone(),
                    latitude: activity.latitude,
                    longitude: activity.longitude,
                    description: r.description,
                    author_name: authors.get(&r.author_id).and_then(|u| u.name.clone()),
                })
            })
            .collect();

        Ok(details)
    }
}
