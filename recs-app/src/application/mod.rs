mod create_trip;
mod extract_recommendations;
mod maintenance;
mod manage_trips;
mod passwordless_auth;
mod resolve_activity;
mod save_recommendations;
mod search_destinations;

pub use create_trip::{CreateTrip, TripOutcome, TripRequest};
pub use extract_recommendations::ExtractRecommendations;
pub use maintenance::{Maintenance, NotifyReport};
pub use manage_trips::{DashboardData, ManageTrips};
pub use passwordless_auth::PasswordlessAuth;
pub use resolve_activity::ResolveActivity;
pub use save_recommendations::{RecommendationEntry, SaveRecommendations, ANONYMOUS_EMAIL};
pub use search_destinations::{SearchDestinations, MAX_RESULTS, MIN_QUERY_LENGTH};

use recs_errors::AppError;
use sea_orm::DbErr;

pub(crate) fn db_error(err: DbErr) -> AppError {
    tracing::error!("Database error: {}", err);
    AppError::Database(err.to_string())
}
