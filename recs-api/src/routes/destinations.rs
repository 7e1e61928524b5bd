use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recs_app::domain::DestinationSource;
use recs_app::AppContext;
use recs_errors::AppError;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "status": "error", "message": message, "results": [] })),
    )
        .into_response()
}

pub async fn search(
    State(ctx): State<AppContext>,
    Path(source): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let Ok(source) = source.parse::<DestinationSource>() else {
        return error_response(StatusCode::NOT_FOUND, "Unknown destination source");
    };

    match ctx.search_destinations.execute(source, &params.query).await {
        Ok(results) => Json(json!({ "status": "success", "results": results })).into_response(),
        Err(AppError::Validation(message)) => error_response(StatusCode::BAD_REQUEST, &message),
        Err(err) => error_response(err.status_code(), &err.user_message()),
    }
}
