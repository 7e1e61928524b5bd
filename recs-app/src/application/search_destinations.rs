use crate::domain::{DestinationResult, DestinationSource};
use crate::infrastructure::db::entities::destination;
use crate::infrastructure::db::DestinationRepository;
use crate::infrastructure::places::{GooglePlacesClient, NominatimClient};
use recs_errors::AppError;
use std::sync::Arc;

pub const MIN_QUERY_LENGTH: usize = 2;
pub const MAX_RESULTS: usize = 10;

pub struct SearchDestinations {
    destinations: DestinationRepository,
    google: Option<Arc<GooglePlacesClient>>,
    nominatim: Arc<NominatimClient>,
}

impl SearchDestinations {
    pub fn new(
        destinations: DestinationRepository,
        google: Option<Arc<GooglePlacesClient>>,
        nominatim: Arc<NominatimClient>,
    ) -> Self {
        Self {
            destinations,
            google,
            nominatim,
        }
    }

    /// Rejects short queries; provider failures degrade to an empty list.
    pub async fn execute(
        &self,
        source: DestinationSource,
        query: &str,
    ) -> Result<Vec<DestinationResult>, AppError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Err(AppError::validation(format!(
                "Query must be at least {MIN_QUERY_LENGTH} characters"
            )));
        }

        let results = match source {
            DestinationSource::Database => self.search_database(query).await,
            DestinationSource::Google => match &self.google {
                Some(google) => google.autocomplete_destinations(query).await,
                None => {
                    tracing::warn!("GOOGLE_MAPS_API_KEY not set, Google destination search disabled");
                    Ok(Vec::new())
                }
            },
            DestinationSource::OpenStreetMap => self.nominatim.search_destinations(query).await,
        };

        match results {
            Ok(mut results) => {
                results.truncate(MAX_RESULTS);
                Ok(results)
            }
            Err(err) => {
                tracing::error!("Destination search via {} failed: {}", source, err);
                Ok(Vec::new())
            }
        }
    }

    async fn search_database(&self, query: &str) -> Result<Vec<DestinationResult>, AppError> {
        let rows = self
            .destinations
            .search(query, MAX_RESULTS as u64)
            .await
            .map_err(super::db_error)?;
        Ok(rows.into_iter().map(into_result).collect())
    }
}

fn into_result(row: destination::Model) -> DestinationResult {
    DestinationResult {
        id: Some(row.id),
        display_name: row.display_name.unwrap_or_else(|| row.name.clone()),
        name: row.name,
        country: row.country,
        country_code: None,
        kind: row.kind.unwrap_or_else(|| "place".to_string()),
        latitude: row.latitude,
        longitude: row.longitude,
        place_id: row.google_place_id,
        osm_id: None,
        source: DestinationSource::Database,
    }
}
