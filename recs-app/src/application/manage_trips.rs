use super::db_error;
use crate::domain::TripRecommendation;
use crate::infrastructure::db::entities::{activity, recommendation, trip, user};
use crate::infrastructure::db::{ActivityRepository, RecommendationRepository, TripRepository, UserRepository};
use recs_errors::AppError;
use uuid::Uuid;

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub trips: Vec<trip::Model>,
    pub activities: Vec<activity::Model>,
    pub recommendations: Vec<recommendation::Model>,
    pub users: Vec<user::Model>,
}

/// Read access to trips and owner-only edits.
pub struct ManageTrips {
    users: UserRepository,
    trips: TripRepository,
    activities: ActivityRepository,
    recommendations: RecommendationRepository,
}

impl ManageTrips {
    pub fn new(
        users: UserRepository,
        trips: TripRepository,
        activities: ActivityRepository,
        recommendations: RecommendationRepository,
    ) -> Self {
        Self {
            users,
            trips,
            activities,
            recommendations,
        }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<trip::Model, AppError> {
        self.trips
            .find_by_slug(slug)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::not_found("Trip"))
    }

    /// Slug lookup with the share token as fallback, so old share links keep working.
    pub async fn find_by_slug_or_share_token(&self, key: &str) -> Result<trip::Model, AppError> {
        if let Some(trip) = self.trips.find_by_slug(key).await.map_err(db_error)? {
            return Ok(trip);
        }
        self.trips
            .find_by_share_token(key)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::not_found("Trip"))
    }

    pub async fn recommendations_for(&self, trip: &trip::Model) -> Result<Vec<TripRecommendation>, AppError> {
        self.recommendations
            .list_with_details(trip.id)
            .await
            .map_err(db_error)
    }

    pub async fn trips_for_owner(&self, user_id: Uuid) -> Result<Vec<trip::Model>, AppError> {
        self.trips.list_for_user(user_id).await.map_err(db_error)
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<user::Model>, AppError> {
        self.users.find_by_id(user_id).await.map_err(db_error)
    }

    /// Deletes the trip with its recommendations and subscriptions.
    pub async fn delete_trip(&self, owner_id: Uuid, slug: &str) -> Result<trip::Model, AppError> {
        let trip = self.owned_trip(owner_id, slug).await?;
        self.trips
            .delete_with_dependents(trip.id)
            .await
            .map_err(db_error)?;
        tracing::info!(trip_id = %trip.id, "Deleted trip");
        Ok(trip)
    }

    pub async fn delete_recommendation(
        &self,
        owner_id: Uuid,
        slug: &str,
        recommendation_id: Uuid,
    ) -> Result<(), AppError> {
        let trip = self.owned_trip(owner_id, slug).await?;
        let recommendation = self
            .recommendations
            .find_by_id(recommendation_id)
            .await
            .map_err(db_error)?
            .filter(|r| r.trip_id == trip.id)
            .ok_or_else(|| AppError::not_found("Recommendation"))?;

        self.recommendations
            .delete(recommendation.id)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub async fn dashboard(&self) -> Result<DashboardData, AppError> {
        Ok(DashboardData {
            trips: self.trips.list_all().await.map_err(db_error)?,
            activities: self.activities.list_all().await.map_err(db_error)?,
            recommendations: self.recommendations.list_all().await.map_err(db_error)?,
            users: self.users.list_all().await.map_err(db_error)?,
        })
    }

    async fn owned_trip(&self, owner_id: Uuid, slug: &str) -> Result<trip::Model, AppError> {
        let trip = self.find_by_slug(slug).await?;
        if trip.user_id != owner_id {
            // Other people's trips are reported as missing.
            return Err(AppError::not_found("Trip"));
        }
        Ok(trip)
    }
}
