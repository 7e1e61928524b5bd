//! Wire shapes of the Google Places and Nominatim responses.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    pub status: String,
    #[serde(default)]
    pub candidates: Vec<PlaceIdOnly>,
}

#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceIdOnly>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceIdOnly {
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsDto {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub website: Option<String>,
    pub geometry: Option<GeometryDto>,
    #[serde(default)]
    pub address_components: Vec<AddressComponentDto>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeometryDto {
    pub location: LatLngDto,
}

#[derive(Debug, Deserialize)]
pub struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponentDto {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<PredictionDto>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionDto {
    pub description: String,
    pub place_id: String,
    pub structured_formatting: Option<StructuredFormattingDto>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StructuredFormattingDto {
    pub main_text: String,
    pub secondary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NominatimPlaceDto {
    pub osm_id: Option<i64>,
    #[serde(default)]
    pub display_name: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub class: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub country_code: Option<String>,
    #[serde(default)]
    pub address: HashMap<String, String>,
}
