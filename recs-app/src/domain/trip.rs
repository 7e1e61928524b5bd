use chrono::{Datelike, NaiveDate};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug separator pattern is valid"));

/// One entry of the AI destination lookup stored alongside a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationSuggestion {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Lower-cases and collapses every run of non-alphanumeric characters into one hyphen.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    SLUG_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// `tokyo-apr-2025` for a trip to Tokyo created in April 2025.
pub fn base_slug(destination: &str, created_on: NaiveDate) -> String {
    let month = MONTHS[created_on.month0() as usize];
    let place = slugify(destination);
    let place = if place.is_empty() { "trip".to_string() } else { place };
    format!("{place}-{month}-{}", created_on.year())
}

/// Attempt 0 is the base slug itself, then `-1`, `-2`, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

pub fn new_share_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
