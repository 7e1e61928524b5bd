mod activity;
mod auth;
mod destination;
mod recommendation;
mod trip;

pub use activity::{ActivityCandidate, PlaceDetails, SearchContext};
pub use auth::{generate_token, LoginLink, TOKEN_LENGTH, TOKEN_TTL_MINUTES};
pub use destination::{DestinationResult, DestinationSource};
pub use recommendation::{ExtractedRecommendation, TripRecommendation};
pub use trip::{base_slug, new_share_token, slug_candidate, slugify, DestinationSuggestion};
