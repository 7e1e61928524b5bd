use super::db_error;
use super::resolve_activity::ResolveActivity;
use crate::domain::{ActivityCandidate, ExtractedRecommendation, SearchContext};
use crate::infrastructure::db::entities::{trip, user};
use crate::infrastructure::db::{
    NewRecommendation, RecommendationRepository, SubscriptionRepository, UserRepository,
};
use crate::infrastructure::security::InputSanitizer;
use recs_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const ANONYMOUS_EMAIL: &str = "anonymous@example.com";
const ANONYMOUS_NAME: &str = "Anonymous User";

/// One confirmed row from the confirmation page.
pub type RecommendationEntry = ExtractedRecommendation;

pub struct SaveRecommendations {
    users: UserRepository,
    recommendations: RecommendationRepository,
    subscriptions: SubscriptionRepository,
    resolve_activity: Arc<ResolveActivity>,
}

impl SaveRecommendations {
    pub fn new(
        users: UserRepository,
        recommendations: RecommendationRepository,
        subscriptions: SubscriptionRepository,
        resolve_activity: Arc<ResolveActivity>,
    ) -> Self {
        Self {
            users,
            recommendations,
            subscriptions,
            resolve_activity,
        }
    }

    /// Persists every entry with a name and returns how many were stored.
    pub async fn execute(
        &self,
        trip: &trip::Model,
        entries: Vec<RecommendationEntry>,
        recommender_name: Option<&str>,
        signed_in_user: Option<Uuid>,
    ) -> Result<usize, AppError> {
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|e| !e.name.trim().is_empty())
            .collect();
        if entries.is_empty() {
            return Err(AppError::validation("Please add at least one recommendation."));
        }

        let author = self.resolve_author(recommender_name, signed_in_user).await?;
        let context = SearchContext {
            vicinity: Some(trip.destination.clone()),
            country: trip.destination_country.clone(),
        };

        // Activities are deduplicated catalog rows, so resolving them before the insert
        // leaves nothing behind that a retry would duplicate.
        let mut batch = Vec::with_capacity(entries.len());
        for entry in entries {
            let candidate = ActivityCandidate::new(entry.name)
                .with_category(entry.category)
                .with_website_url(entry.website_url);
            let activity = self.resolve_activity.execute(&candidate, &context).await?;

            batch.push(NewRecommendation {
                activity_id: activity.id,
                description: entry
                    .description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
            });
        }

        let saved = self
            .recommendations
            .create_batch(trip.id, author.id, batch)
            .await
            .map_err(db_error)?
            .len();

        tracing::info!(trip_id = %trip.id, author_id = %author.id, "Saved {} recommendations", saved);
        Ok(saved)
    }

    /// Signed-in user first, then a throwaway user named after the recommender, then the
    /// shared anonymous user.
    async fn resolve_author(
        &self,
        recommender_name: Option<&str>,
        signed_in_user: Option<Uuid>,
    ) -> Result<user::Model, AppError> {
        if let Some(user_id) = signed_in_user {
            if let Some(user) = self.users.find_by_id(user_id).await.map_err(db_error)? {
                return Ok(user);
            }
        }

        let recommender_name = recommender_name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = recommender_name {
            let email = format!("temp_{}@example.com", &Uuid::new_v4().simple().to_string()[..8]);
            return self
                .users
                .create(&email, Some(name))
                .await
                .map_err(db_error);
        }

        let (anonymous, created) = self
            .users
            .get_or_create(ANONYMOUS_EMAIL)
            .await
            .map_err(db_error)?;
        if created || anonymous.name.is_none() {
            return self
                .users
                .update_name(anonymous, ANONYMOUS_NAME)
                .await
                .map_err(db_error);
        }
        Ok(anonymous)
    }

    /// Subscribes `email` to updates about the trip. Returns false when it already was.
    pub async fn subscribe(&self, trip: &trip::Model, email: &str) -> Result<bool, AppError> {
        let email = InputSanitizer::validate_email(email)?;
        let (user, _) = self.users.get_or_create(&email).await.map_err(db_error)?;
        self.subscriptions
            .subscribe(user.id, trip.id)
            .await
            .map_err(db_error)
    }
}
