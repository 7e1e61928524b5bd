use super::{chrome, redirect_with_error, trip_url, PageResult};
use crate::flash;
use crate::session::{self, WizardState};
use crate::views::{render_check_email_page, render_name_resolution_page, render_user_info_page};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use recs_app::application::{TripOutcome, TripRequest};
use recs_app::AppContext;
use recs_errors::AppError;
use serde::Deserialize;
use tower_sessions::Session;

const VERIFY_MESSAGE: &str =
    "For security, we need to verify it's you since this email is already registered.";

#[derive(Deserialize)]
pub struct DestinationForm {
    #[serde(default)]
    destination: String,
}

#[derive(Deserialize)]
pub struct CompleteTripForm {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
pub struct ResolveNameForm {
    #[serde(default)]
    resolved_name: String,
    #[serde(default)]
    other_name: String,
}

pub async fn create_trip(session: Session, Form(form): Form<DestinationForm>) -> PageResult {
    let destination = form.destination.trim();
    if destination.is_empty() {
        return redirect_with_error(&session, "Please enter a destination", "/").await;
    }
    session::set(&session, session::TEMP_DESTINATION, destination).await?;
    Ok(Redirect::to("/user-info").into_response())
}

pub async fn user_info(session: Session) -> PageResult {
    let Some(destination) = session::get::<String>(&session, session::TEMP_DESTINATION).await? else {
        return redirect_with_error(&session, "Please enter a destination", "/").await;
    };
    Ok(Html(render_user_info_page(&chrome(&session).await, &destination)).into_response())
}

pub async fn complete_trip(
    State(ctx): State<AppContext>,
    session: Session,
    Form(form): Form<CompleteTripForm>,
) -> PageResult {
    let destination = match form.destination.trim() {
        "" => session::get::<String>(&session, session::TEMP_DESTINATION)
            .await?
            .unwrap_or_default(),
        given => given.to_string(),
    };
    if destination.trim().is_empty() {
        return redirect_with_error(&session, "Please enter a destination", "/").await;
    }
    if form.name.trim().is_empty() {
        return redirect_with_error(&session, "Please enter your name", "/user-info").await;
    }
    if form.email.trim().is_empty() {
        return redirect_with_error(&session, "Please enter your email address", "/user-info").await;
    }

    let request = TripRequest {
        destination,
        name: form.name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
    };

    match ctx.create_trip.complete_trip(request.clone()).await {
        Ok(outcome) => handle_outcome(&ctx, &session, outcome, request).await,
        Err(AppError::Validation(message)) => {
            redirect_with_error(&session, message, "/user-info").await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn name_resolution(State(ctx): State<AppContext>, session: Session) -> PageResult {
    let state = WizardState::load(&session).await?;
    let (Some(_), Some(email), Some(name)) = (state.destination, state.email, state.name) else {
        return redirect_with_error(&session, "Please start by entering a destination", "/").await;
    };

    let previous_name = ctx
        .create_trip
        .registered_name(&email)
        .await?
        .unwrap_or_default();
    Ok(Html(render_name_resolution_page(
        &chrome(&session).await,
        &previous_name,
        &name,
        &email,
    ))
    .into_response())
}

pub async fn resolve_name(
    State(ctx): State<AppContext>,
    session: Session,
    Form(form): Form<ResolveNameForm>,
) -> PageResult {
    let state = WizardState::load(&session).await?;
    let (Some(destination), Some(email)) = (state.destination, state.email) else {
        return redirect_with_error(&session, "Please start by entering a destination", "/").await;
    };

    let name = if form.resolved_name == "other" {
        form.other_name.trim().to_string()
    } else {
        form.resolved_name.trim().to_string()
    };
    if name.is_empty() {
        return redirect_with_error(&session, "Please choose a name", "/name-resolution").await;
    }

    let request = TripRequest {
        destination,
        name,
        email,
    };
    match ctx.create_trip.resolve_name(request.clone()).await {
        Ok(outcome) => handle_outcome(&ctx, &session, outcome, request).await,
        Err(AppError::Validation(message)) => {
            redirect_with_error(&session, message, "/name-resolution").await
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_outcome(
    ctx: &AppContext,
    session: &Session,
    outcome: TripOutcome,
    request: TripRequest,
) -> PageResult {
    match outcome {
        TripOutcome::NeedsNameResolution { .. } => {
            WizardState {
                destination: Some(request.destination),
                email: Some(request.email),
                name: Some(request.name),
            }
            .store(session)
            .await?;
            Ok(Redirect::to("/name-resolution").into_response())
        }
        TripOutcome::SignedIn { user, trip } => {
            WizardState::clear(session).await?;
            session::sign_in(session, &user).await?;
            flash::success(session, "Your trip has been created! Share the link to collect recommendations.").await?;
            Ok(Redirect::to(&trip_url(&trip.slug)).into_response())
        }
        TripOutcome::VerificationRequired { trip, link } => {
            WizardState::clear(session).await?;
            session::set(session, session::AUTH_NEXT, trip_url(&trip.slug)).await?;
            let shown_link = ctx.config.show_login_links().then_some(link.url.as_str());
            Ok(Html(render_check_email_page(
                &chrome(session).await,
                &link.email,
                Some(VERIFY_MESSAGE),
                shown_link,
            ))
            .into_response())
        }
    }
}
