use super::dto::NominatimPlaceDto;
use crate::domain::{DestinationResult, DestinationSource};
use recs_errors::AppError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "RecsApp/1.0 (https://recommendations.app)";
/// Nominatim's usage policy allows one request per second.
const MIN_REQUEST_SPACING: Duration = Duration::from_secs(1);

pub struct NominatimClient {
    http_client: reqwest::Client,
    search_url: String,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    pub fn new() -> Self {
        Self::with_search_url(NOMINATIM_SEARCH_URL.to_string())
    }

    pub fn with_search_url(search_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            search_url,
            last_request: Mutex::new(None),
        }
    }

    pub async fn search_destinations(&self, query: &str) -> Result<Vec<DestinationResult>, AppError> {
        tracing::info!("Searching destinations using OpenStreetMap for: {}", query);
        self.respect_rate_limit().await;

        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "10"),
                ("featuretype", "city,state,country"),
                ("accept-language", "en"),
            ])
            .send()
            .await
            .map_err(|e| AppError::PlacesService(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned non-200 status: {}", response.status());
            return Err(AppError::PlacesService(format!(
                "Nominatim status {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlaceDto> = response
            .json()
            .await
            .map_err(|e| AppError::PlacesService(e.to_string()))?;
        tracing::info!("Found {} results from Nominatim", places.len());

        Ok(places.into_iter().map(into_destination).collect())
    }

    /// Holds the lock across the sleep so concurrent callers queue behind each other.
    async fn respect_rate_limit(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_SPACING {
                let wait = MIN_REQUEST_SPACING - elapsed;
                tracing::debug!("Rate limiting Nominatim: sleeping {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

fn into_destination(place: NominatimPlaceDto) -> DestinationResult {
    let kind = determine_place_type(&place).to_string();
    let name = place
        .display_name
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let country = place.address.get("country").cloned();
    let country_code = place
        .country_code
        .clone()
        .or_else(|| place.address.get("country_code").cloned())
        .map(|c| c.to_uppercase());
    let coordinate = |value: &Option<String>| value.as_deref().and_then(|v| v.parse::<f64>().ok());

    DestinationResult {
        id: None,
        name,
        display_name: place.display_name.clone(),
        country,
        country_code,
        kind,
        latitude: coordinate(&place.lat),
        longitude: coordinate(&place.lon),
        place_id: None,
        osm_id: place.osm_id,
        source: DestinationSource::OpenStreetMap,
    }
}

/// Classifies a Nominatim hit as `country`, `region`, `city` or `place`, preferring the
/// address breakdown over the OSM class/type pair.
pub(crate) fn determine_place_type(place: &NominatimPlaceDto) -> &'static str {
    let has = |key: &str| place.address.contains_key(key);
    let kind = place.kind.as_deref();

    if has("country") && !has("state") && !has("city") {
        return "country";
    }
    if has("state") && !has("city") {
        return "region";
    }
    if has("city") || kind == Some("city") {
        return "city";
    }

    match (place.class.as_deref(), kind) {
        (Some("place"), Some("city" | "town" | "village")) => "city",
        (Some("place"), Some("state" | "region" | "province")) => "region",
        (Some("boundary"), Some("administrative")) => "region",
        _ => "place",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place(value: serde_json::Value) -> NominatimPlaceDto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn country_only_address_is_a_country() {
        let p = place(json!({"display_name": "Portugal", "address": {"country": "Portugal"}}));
        assert_eq!(determine_place_type(&p), "country");
    }

    #[test]
    fn state_without_city_is_a_region() {
        let p = place(json!({
            "display_name": "Bavaria, Germany",
            "address": {"state": "Bavaria", "country": "Germany"}
        }));
        assert_eq!(determine_place_type(&p), "region");
    }

    #[test]
    fn city_address_is_a_city() {
        let p = place(json!({
            "display_name": "Lisbon, Portugal",
            "address": {"city": "Lisbon", "state": "Lisbon", "country": "Portugal"}
        }));
        assert_eq!(determine_place_type(&p), "city");
    }

    #[test]
    fn falls_back_to_osm_class() {
        let p = place(json!({"display_name": "Hallstatt", "class": "place", "type": "village"}));
        assert_eq!(determine_place_type(&p), "city");

        let p = place(json!({"display_name": "Somewhere", "class": "amenity", "type": "cafe"}));
        assert_eq!(determine_place_type(&p), "place");
    }

    #[test]
    fn converts_coordinates_and_country_code() {
        let p = place(json!({
            "osm_id": 5400890,
            "display_name": "Lisbon, Portugal",
            "lat": "38.7077507",
            "lon": "-9.1365919",
            "address": {"city": "Lisbon", "country": "Portugal", "country_code": "pt"}
        }));
        let result = into_destination(p);
        assert_eq!(result.name, "Lisbon");
        assert_eq!(result.country_code.as_deref(), Some("PT"));
        assert_eq!(result.latitude, Some(38.7077507));
        assert_eq!(result.osm_id, Some(5400890));
        assert_eq!(result.source, DestinationSource::OpenStreetMap);
    }
}
