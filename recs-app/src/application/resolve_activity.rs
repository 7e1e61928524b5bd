use super::db_error;
use crate::domain::{ActivityCandidate, PlaceDetails, SearchContext};
use crate::infrastructure::db::entities::activity;
use crate::infrastructure::db::{is_unique_violation, ActivityRepository};
use crate::infrastructure::places::GooglePlacesClient;
use recs_errors::AppError;
use std::sync::Arc;

/// Maps a submitted place name onto the shared activity catalog.
pub struct ResolveActivity {
    activities: ActivityRepository,
    places: Option<Arc<GooglePlacesClient>>,
}

impl ResolveActivity {
    pub fn new(activities: ActivityRepository, places: Option<Arc<GooglePlacesClient>>) -> Self {
        Self { activities, places }
    }

    pub async fn execute(
        &self,
        candidate: &ActivityCandidate,
        context: &SearchContext,
    ) -> Result<activity::Model, AppError> {
        if candidate.name.is_empty() {
            return Err(AppError::validation("Activity name is required"));
        }

        if let Some(existing) = self
            .activities
            .find_by_name(&candidate.name)
            .await
            .map_err(db_error)?
        {
            tracing::debug!(activity_id = %existing.id, "Reusing activity by name");
            return Ok(existing);
        }

        if let Some(place_id) = candidate.google_place_id.as_deref() {
            if let Some(existing) = self
                .activities
                .find_by_place_id(place_id)
                .await
                .map_err(db_error)?
            {
                tracing::debug!(activity_id = %existing.id, "Reusing activity by place id");
                return Ok(existing);
            }
        }

        match self.lookup_place(candidate, context).await {
            Some(place) => self.store_enriched(candidate, &place).await,
            None => self.activities.create_bare(candidate).await.map_err(db_error),
        }
    }

    async fn lookup_place(
        &self,
        candidate: &ActivityCandidate,
        context: &SearchContext,
    ) -> Option<PlaceDetails> {
        let places = self.places.as_ref()?;

        let result = match candidate.google_place_id.as_deref() {
            Some(place_id) => places.place_details(place_id).await,
            None => {
                places
                    .find_place(&candidate.name, candidate.category.as_deref(), context)
                    .await
            }
        };

        match result {
            Ok(place) => place,
            Err(err) => {
                tracing::warn!("Place lookup failed for {}: {}", candidate.name, err);
                None
            }
        }
    }

    async fn store_enriched(
        &self,
        candidate: &ActivityCandidate,
        place: &PlaceDetails,
    ) -> Result<activity::Model, AppError> {
        if let Some(existing) = self
            .activities
            .find_by_place_id(&place.place_id)
            .await
            .map_err(db_error)?
        {
            return Ok(existing);
        }

        match self.activities.create_enriched(candidate, place).await {
            Ok(created) => {
                tracing::info!(activity_id = %created.id, place_id = %place.place_id, "Created enriched activity");
                Ok(created)
            }
            Err(err) if is_unique_violation(&err) => self
                .activities
                .find_by_place_id(&place.place_id)
                .await
                .map_err(db_error)?
                .ok_or_else(|| db_error(err)),
            Err(err) => Err(db_error(err)),
        }
    }
}
