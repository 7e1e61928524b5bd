use serde::{Deserialize, Serialize};

/// A place name as submitted by a contributor, before it is matched to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityCandidate {
    pub name: String,
    pub category: Option<String>,
    pub website_url: Option<String>,
    /// Set when the caller already resolved the place with the provider.
    pub google_place_id: Option<String>,
}

impl ActivityCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = non_blank(category);
        self
    }

    pub fn with_website_url(mut self, website_url: Option<String>) -> Self {
        self.website_url = non_blank(website_url);
        self
    }

    pub fn with_google_place_id(mut self, google_place_id: Option<String>) -> Self {
        self.google_place_id = non_blank(google_place_id);
        self
    }
}

/// Hints used to disambiguate a place name against the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchContext {
    pub vicinity: Option<String>,
    pub country: Option<String>,
}

impl SearchContext {
    /// Vicinity wins over country, matching how the provider query is biased.
    pub fn location_hint(&self) -> Option<&str> {
        self.vicinity.as_deref().or(self.country.as_deref())
    }
}

/// Place data returned by the places provider, normalised for the Activity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub category: Option<String>,
    pub website_url: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub raw: serde_json::Value,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_are_dropped() {
        let candidate = ActivityCandidate::new("  Ramen Street ")
            .with_category(Some("  ".to_string()))
            .with_website_url(Some("https://ramen.example".to_string()));
        assert_eq!(candidate.name, "Ramen Street");
        assert_eq!(candidate.category, None);
        assert_eq!(candidate.website_url.as_deref(), Some("https://ramen.example"));
    }

    #[test]
    fn vicinity_is_preferred_over_country() {
        let ctx = SearchContext {
            vicinity: Some("Tokyo".to_string()),
            country: Some("Japan".to_string()),
        };
        assert_eq!(ctx.location_hint(), Some("Tokyo"));

        let ctx = SearchContext {
            vicinity: None,
            country: Some("Japan".to_string()),
        };
        assert_eq!(ctx.location_hint(), Some("Japan"));
    }
}
