use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationSource {
    Database,
    Google,
    OpenStreetMap,
}

impl DestinationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Google => "google",
            Self::OpenStreetMap => "openstreetmap",
        }
    }
}

impl fmt::Display for DestinationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "google" => Ok(Self::Google),
            "openstreetmap" | "osm" => Ok(Self::OpenStreetMap),
            other => Err(format!("unknown destination source: {other}")),
        }
    }
}

/// Destination search hit, in the same shape for every backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationResult {
    pub id: Option<Uuid>,
    pub name: String,
    pub display_name: String,
    pub country: Option<String>,
    pub country_code: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osm_id: Option<i64>,
    pub source: DestinationSource,
}
