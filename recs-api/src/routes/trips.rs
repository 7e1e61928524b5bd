use super::{chrome, login_redirect, trip_url, PageResult};
use crate::flash;
use crate::session;
use crate::views::{render_my_trips_page, render_thank_you_page, render_trip_page};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use recs_app::AppContext;
use recs_errors::AppError;
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use uuid::Uuid;

const SUBSCRIBED_MESSAGE: &str = "Thank you! We'll notify you when all recommendations are in.";

#[derive(Deserialize)]
pub struct SaveEmailForm {
    #[serde(default)]
    email: String,
}

pub async fn my_trips(State(ctx): State<AppContext>, session: Session) -> PageResult {
    let Some(user_id) = session::current_user_id(&session).await? else {
        return Ok(login_redirect("/my-trips"));
    };
    let trips = ctx.manage_trips.trips_for_owner(user_id).await?;
    Ok(Html(render_my_trips_page(&chrome(&session).await, &trips)).into_response())
}

pub async fn view_trip(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug_or_share_token(&slug).await?;
    if trip.slug != slug {
        return Ok(Redirect::to(&trip_url(&trip.slug)).into_response());
    }

    let recommendations = ctx.manage_trips.recommendations_for(&trip).await?;
    let is_owner = session::current_user_id(&session).await? == Some(trip.user_id);
    let share_url = format!("{}{}", ctx.config.base_url, trip_url(&trip.slug));

    Ok(Html(render_trip_page(
        &chrome(&session).await,
        &trip,
        &recommendations,
        is_owner,
        &share_url,
    ))
    .into_response())
}

pub async fn delete_trip(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
) -> PageResult {
    let Some(user_id) = session::current_user_id(&session).await? else {
        return Ok(login_redirect(&trip_url(&slug)));
    };
    let trip = ctx.manage_trips.delete_trip(user_id, &slug).await?;
    flash::success(&session, format!("Your trip to {} was deleted.", trip.destination)).await?;
    Ok(Redirect::to("/my-trips").into_response())
}

pub async fn delete_recommendation(
    State(ctx): State<AppContext>,
    session: Session,
    Path((slug, id)): Path<(String, Uuid)>,
) -> PageResult {
    let Some(user_id) = session::current_user_id(&session).await? else {
        return Ok(login_redirect(&trip_url(&slug)));
    };
    ctx.manage_trips
        .delete_recommendation(user_id, &slug, id)
        .await?;
    flash::success(&session, "Recommendation removed.").await?;
    Ok(Redirect::to(&trip_url(&slug)).into_response())
}

pub async fn thank_you(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    Ok(Html(render_thank_you_page(&chrome(&session).await, &trip)).into_response())
}

/// Answers JSON to XHR requests and redirects plain form posts.
pub async fn save_email(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(form): Form<SaveEmailForm>,
) -> PageResult {
    let xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));

    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    let thank_you_url = format!("{}/thank-you", trip_url(&trip.slug));

    let result = if form.email.trim().is_empty() {
        Err(AppError::validation("Please provide an email address"))
    } else {
        ctx.save_recommendations.subscribe(&trip, &form.email).await
    };

    match result {
        Ok(_) if xhr => Ok(Json(json!({ "success": true, "message": SUBSCRIBED_MESSAGE })).into_response()),
        Ok(_) => {
            flash::success(&session, SUBSCRIBED_MESSAGE).await?;
            Ok(Redirect::to(&trip_url(&trip.slug)).into_response())
        }
        Err(AppError::Validation(message)) if xhr => Ok(json_error(StatusCode::BAD_REQUEST, &message)),
        Err(AppError::Validation(message)) => {
            flash::error(&session, message).await?;
            Ok(Redirect::to(&thank_you_url).into_response())
        }
        Err(err) if xhr => Ok(json_error(err.status_code(), &err.user_message())),
        Err(err) => Err(err.into()),
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}
