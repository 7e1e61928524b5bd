use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry produced by the AI extractor or typed on the confirmation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecommendation {
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExtractedRecommendation {
    /// Used when the extractor cannot produce structured entries: keep the raw text so
    /// the contributor can still edit and save it.
    pub fn catch_all(destination: &str, raw_text: &str) -> Self {
        Self {
            name: format!("Recommendations for {}", destination.trim()),
            category: Some("Other".to_string()),
            website_url: None,
            description: Some(raw_text.trim().to_string()),
        }
    }
}

/// A recommendation joined with its activity and author, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecommendation {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub category: Option<String>,
    pub website_url: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub author_name: Option<String>,
}
