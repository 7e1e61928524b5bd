use super::entities::{activity, Activity};
use crate::domain::{ActivityCandidate, PlaceDetails};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<activity::Model>, DbErr> {
        Activity::find_by_id(id).one(&self.db).await
    }

    /// Exact, case-insensitive name match. The oldest row wins when duplicates exist.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<activity::Model>, DbErr> {
        Activity::find()
            .filter(activity::Column::NameKey.eq(name_key(name)))
            .order_by_asc(activity::Column::CreatedAt)
            .one(&self.db)
            .await
    }

    pub async fn find_by_place_id(&self, place_id: &str) -> Result<Option<activity::Model>, DbErr> {
        Activity::find()
            .filter(activity::Column::GooglePlaceId.eq(place_id))
            .one(&self.db)
            .await
    }

    /// Inserts a record carrying only what the contributor typed.
    pub async fn create_bare(&self, candidate: &ActivityCandidate) -> Result<activity::Model, DbErr> {
        let now = Utc::now();
        let active = activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(candidate.name.clone()),
            name_key: Set(name_key(&candidate.name)),
            category: Set(candidate.category.clone()),
            website_url: Set(candidate.website_url.clone()),
            address: Set(None),
            city: Set(None),
            country: Set(None),
            latitude: Set(None),
            longitude: Set(None),
            google_place_id: Set(candidate.google_place_id.clone()),
            place_data: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(&self.db).await
    }

    /// Inserts a record enriched with provider data. The submitted name is kept so that
    /// later submissions under the same wording still match by name.
    pub async fn create_enriched(
        &self,
        candidate: &ActivityCandidate,
        place: &PlaceDetails,
    ) -> Result<activity::Model, DbErr> {
        let now = Utc::now();
        let active = activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(candidate.name.clone()),
            name_key: Set(name_key(&candidate.name)),
            category: Set(candidate.category.clone().or_else(|| place.category.clone())),
            website_url: Set(place.website_url.clone().or_else(|| candidate.website_url.clone())),
            address: Set(place.address.clone()),
            city: Set(place.city.clone()),
            country: Set(place.country.clone()),
            latitude: Set(place.latitude),
            longitude: Set(place.longitude),
            google_place_id: Set(Some(place.place_id.clone())),
            place_data: Set(Some(place.raw.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active.insert(&self.db).await
    }

    pub async fn list_all(&self) -> Result<Vec<activity::Model>, DbErr> {
        Activity::find()
            .order_by_asc(activity::Column::Name)
            .all(&self.db)
            .await
    }
}

/// Case folding happens here rather than in SQL: SQLite's `LOWER` only folds ASCII.
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
