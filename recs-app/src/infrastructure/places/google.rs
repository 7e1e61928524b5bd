use super::dto::{
    AutocompleteResponse, DetailsResponse, FindPlaceResponse, PlaceDetailsDto, TextSearchResponse,
};
use crate::domain::{DestinationResult, DestinationSource, PlaceDetails, SearchContext};
use recs_errors::AppError;
use serde::de::DeserializeOwned;
use std::time::Duration;

const GOOGLE_PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place";
const DETAIL_FIELDS: &str = "name,place_id,formatted_address,geometry,website,address_components,type";

pub struct GooglePlacesClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GOOGLE_PLACES_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Best match for a place name: Find Place biased by the context first, then a Text
    /// Search on `name category location`, then Place Details for the winning ID.
    pub async fn find_place(
        &self,
        name: &str,
        category: Option<&str>,
        context: &SearchContext,
    ) -> Result<Option<PlaceDetails>, AppError> {
        tracing::info!("Searching Google Places for: {}", name);

        if let Some(place_id) = self.find_place_id(name, context).await? {
            tracing::info!("Found place_id for {}: {}", name, place_id);
            return self.place_details(&place_id).await;
        }

        let mut query = match category {
            Some(category) => format!("{name} {category}"),
            None => name.to_string(),
        };
        if let Some(hint) = context.location_hint() {
            query = format!("{query} {hint}");
        }

        tracing::info!("No exact match, trying text search with: {}", query);
        match self.text_search_place_id(&query).await? {
            Some(place_id) => self.place_details(&place_id).await,
            None => Ok(None),
        }
    }

    pub async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, AppError> {
        let response: DetailsResponse = self
            .get_json(
                "details",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        if response.status != "OK" {
            tracing::warn!("Place details for {} returned status {}", place_id, response.status);
            return Ok(None);
        }
        let Some(raw) = response.result else {
            return Ok(None);
        };

        let dto: PlaceDetailsDto = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::PlacesService(format!("invalid details payload: {e}")))?;
        Ok(Some(into_place_details(dto, raw)))
    }

    /// City-level suggestions for the destination search box.
    pub async fn autocomplete_destinations(
        &self,
        query: &str,
    ) -> Result<Vec<DestinationResult>, AppError> {
        let response: AutocompleteResponse = self
            .get_json(
                "autocomplete",
                &[("input", query), ("types", "(regions)"), ("language", "en")],
            )
            .await?;

        if response.status != "OK" && response.status != "ZERO_RESULTS" {
            return Err(AppError::PlacesService(format!(
                "autocomplete returned status {}",
                response.status
            )));
        }

        Ok(response
            .predictions
            .into_iter()
            .map(|p| {
                let (name, secondary) = match p.structured_formatting {
                    Some(f) => (f.main_text, f.secondary_text),
                    None => (
                        p.description.split(',').next().unwrap_or_default().trim().to_string(),
                        None,
                    ),
                };
                let country = secondary
                    .as_deref()
                    .and_then(|s| s.rsplit(',').next())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                let kind = if p.types.iter().any(|t| t == "country") {
                    "country"
                } else if p.types.iter().any(|t| t.starts_with("administrative_area")) {
                    "region"
                } else if p.types.iter().any(|t| t == "locality") {
                    "city"
                } else {
                    "place"
                };
                DestinationResult {
                    id: None,
                    name,
                    display_name: p.description,
                    country,
                    country_code: None,
                    kind: kind.to_string(),
                    latitude: None,
                    longitude: None,
                    place_id: Some(p.place_id),
                    osm_id: None,
                    source: DestinationSource::Google,
                }
            })
            .collect())
    }

    async fn find_place_id(
        &self,
        name: &str,
        context: &SearchContext,
    ) -> Result<Option<String>, AppError> {
        let bias = context.location_hint().map(|hint| format!("name:{hint}"));
        let mut params = vec![("input", name), ("inputtype", "textquery"), ("fields", "place_id")];
        if let Some(bias) = bias.as_deref() {
            params.push(("locationbias", bias));
        }

        let response: FindPlaceResponse = self.get_json("findplacefromtext", &params).await?;
        if response.status != "OK" {
            return Ok(None);
        }
        Ok(response.candidates.into_iter().find_map(|c| c.place_id))
    }

    async fn text_search_place_id(&self, query: &str) -> Result<Option<String>, AppError> {
        let response: TextSearchResponse = self.get_json("textsearch", &[("query", query)]).await?;
        if response.status != "OK" {
            return Ok(None);
        }
        Ok(response.results.into_iter().find_map(|r| r.place_id))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let response = self
            .http_client
            .get(format!("{}/{}/json", self.base_url, endpoint))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::PlacesService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Google Places {} error: {}", endpoint, status);
            return Err(AppError::PlacesService(format!("API error: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::PlacesService(e.to_string()))
    }
}

fn into_place_details(dto: PlaceDetailsDto, raw: serde_json::Value) -> PlaceDetails {
    let component = |kind: &str| {
        dto.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_name.clone())
    };
    let city = component("locality").or_else(|| component("postal_town"));
    let country = component("country");
    let category = dto
        .types
        .iter()
        .find(|t| t.as_str() != "point_of_interest" && t.as_str() != "establishment")
        .map(|t| t.replace('_', " "));

    PlaceDetails {
        place_id: dto.place_id,
        name: dto.name,
        category,
        website_url: dto.website,
        address: dto.formatted_address,
        city,
        country,
        latitude: dto.geometry.as_ref().map(|g| g.location.lat),
        longitude: dto.geometry.as_ref().map(|g| g.location.lng),
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn details_payload_maps_address_components() {
        let raw = json!({
            "place_id": "ChIJ-ramen",
            "name": "Tokyo Ramen Street",
            "formatted_address": "1-9-1 Marunouchi, Chiyoda City, Tokyo 100-0005, Japan",
            "website": "https://www.tokyoeki-1bangai.co.jp/",
            "geometry": {"location": {"lat": 35.6794, "lng": 139.7680}},
            "address_components": [
                {"long_name": "Chiyoda City", "short_name": "Chiyoda City", "types": ["locality", "political"]},
                {"long_name": "Japan", "short_name": "JP", "types": ["country", "political"]}
            ],
            "types": ["restaurant", "food", "point_of_interest", "establishment"]
        });
        let dto: PlaceDetailsDto = serde_json::from_value(raw.clone()).unwrap();
        let details = into_place_details(dto, raw);

        assert_eq!(details.city.as_deref(), Some("Chiyoda City"));
        assert_eq!(details.country.as_deref(), Some("Japan"));
        assert_eq!(details.category.as_deref(), Some("restaurant"));
        assert_eq!(details.latitude, Some(35.6794));
        assert_eq!(details.raw["place_id"], "ChIJ-ramen");
    }
}
