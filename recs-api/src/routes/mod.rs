mod admin;
mod audio;
mod auth;
mod destinations;
mod pages;
mod recommendations;
mod trips;
mod wizard;

use crate::flash;
use crate::session;
use crate::views::{render_error_page, Chrome};
use axum::extract::DefaultBodyLimit;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use recs_app::AppContext;
use recs_errors::AppError;
use time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

pub fn build_router(ctx: AppContext) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(!ctx.config.debug)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    Router::new()
        .route("/", get(pages::index))
        .route("/how-it-works", get(pages::how_it_works))
        .route("/health", get(pages::health))
        .route("/create-trip", post(wizard::create_trip))
        .route("/user-info", get(wizard::user_info))
        .route("/complete-trip", post(wizard::complete_trip))
        .route("/name-resolution", get(wizard::name_resolution))
        .route("/resolve-name", post(wizard::resolve_name))
        .route("/my-trips", get(trips::my_trips))
        .route("/trip/{slug}", get(trips::view_trip))
        .route("/trip/{slug}/delete", post(trips::delete_trip))
        .route(
            "/trip/{slug}/recommendations/{id}/delete",
            post(trips::delete_recommendation),
        )
        .route("/trip/{slug}/thank-you", get(trips::thank_you))
        .route("/trip/{slug}/save-email", post(trips::save_email))
        .route("/trip/{slug}/add", get(recommendations::add))
        .route("/trip/{slug}/process", post(recommendations::process))
        .route("/trip/{slug}/process-audio", post(recommendations::process_audio))
        .route("/trip/{slug}/confirm-audio", get(recommendations::confirm_audio))
        .route("/trip/{slug}/save", post(recommendations::save))
        .route(
            "/api/transcribe",
            post(audio::transcribe).layer(DefaultBodyLimit::max(audio::MAX_UPLOAD_BYTES)),
        )
        .route("/api/destinations/{source}", get(destinations::search))
        .route("/auth/login", get(auth::login_page).post(auth::request_login))
        .route("/auth/verify/{token}", get(auth::verify))
        .route("/auth/logout", get(auth::logout))
        .route("/admin", get(admin::dashboard))
        .fallback(pages::not_found)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(ctx)
}

/// Error rendered as an HTML page with the status of the underlying `AppError`.
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.0.status_code(), Html(render_error_page(&self.0.user_message()))).into_response()
    }
}

pub type PageResult = Result<Response, PageError>;

/// Flashes and sign-in state for the page about to be rendered.
pub(crate) async fn chrome(session: &Session) -> Chrome {
    Chrome {
        flashes: flash::take_all(session).await,
        signed_in: matches!(session::current_user_id(session).await, Ok(Some(_))),
    }
}

pub(crate) async fn redirect_with_error(
    session: &Session,
    message: impl Into<String>,
    to: &str,
) -> PageResult {
    flash::error(session, message).await?;
    Ok(Redirect::to(to).into_response())
}

pub(crate) fn login_redirect(next: &str) -> Response {
    Redirect::to(&format!("/auth/login?next={}", urlencoding::encode(next))).into_response()
}

pub(crate) fn trip_url(slug: &str) -> String {
    format!("/trip/{slug}")
}
