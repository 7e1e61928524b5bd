use super::chrome;
use crate::views::{render_error_page, render_how_it_works_page, render_index_page};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use recs_app::AppContext;
use serde_json::json;
use tower_sessions::Session;

pub async fn index(session: Session) -> Html<String> {
    Html(render_index_page(&chrome(&session).await))
}

pub async fn how_it_works(session: Session) -> Html<String> {
    Html(render_how_it_works_page(&chrome(&session).await))
}

pub async fn health(State(ctx): State<AppContext>) -> Response {
    match ctx.db.ping().await {
        Ok(()) => Json(json!({ "status": "ok", "database": "ok" })).into_response(),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "database": "unreachable" })),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render_error_page("The page you are looking for does not exist.")),
    )
        .into_response()
}
