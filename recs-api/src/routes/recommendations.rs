use super::{chrome, redirect_with_error, trip_url, PageResult};
use crate::session;
use crate::views::{render_add_recommendation_page, render_confirm_page};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use recs_app::application::RecommendationEntry;
use recs_app::domain::ExtractedRecommendation;
use recs_app::infrastructure::db::entities::trip;
use recs_app::infrastructure::openai::parse_json_array;
use recs_app::AppContext;
use recs_errors::AppError;
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Deserialize)]
pub struct ProcessForm {
    #[serde(default)]
    unstructured_recommendations: String,
    #[serde(default)]
    recommender_name: Option<String>,
}

#[derive(Deserialize)]
pub struct ProcessAudioForm {
    #[serde(default)]
    recommendations_data: String,
    #[serde(default)]
    recommender_name: Option<String>,
}

fn add_url(slug: &str) -> String {
    format!("{}/add", trip_url(slug))
}

fn destination_of(trip: &trip::Model) -> &str {
    trip.destination_display_name
        .as_deref()
        .unwrap_or(&trip.destination)
}

pub async fn add(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    Ok(Html(render_add_recommendation_page(&chrome(&session).await, &trip)).into_response())
}

pub async fn process(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
    Form(form): Form<ProcessForm>,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    if form.unstructured_recommendations.trim().is_empty() {
        return redirect_with_error(&session, "Please enter some recommendations", &add_url(&slug)).await;
    }

    let entries = ctx
        .extract_recommendations
        .execute(&form.unstructured_recommendations, destination_of(&trip))
        .await?;

    Ok(Html(render_confirm_page(
        &chrome(&session).await,
        &trip,
        &entries,
        non_blank(form.recommender_name.as_deref()),
    ))
    .into_response())
}

/// Receives entries already extracted from a recording and parks them in the session for
/// the confirmation page.
pub async fn process_audio(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
    Form(form): Form<ProcessAudioForm>,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    if form.recommendations_data.trim().is_empty() {
        return redirect_with_error(&session, "No recommendation data received", &add_url(&trip.slug)).await;
    }

    let entries: Vec<ExtractedRecommendation> =
        match parse_json_array(&form.recommendations_data) {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                tracing::warn!(slug = %trip.slug, "Rejected malformed audio recommendations");
                return redirect_with_error(
                    &session,
                    "Invalid recommendation data format",
                    &add_url(&trip.slug),
                )
                .await;
            }
        };

    session::store_extracted(&session, &entries, non_blank(form.recommender_name.as_deref())).await?;
    tracing::info!(slug = %trip.slug, "Stored {} audio recommendations in session", entries.len());
    Ok(Redirect::to(&format!("{}/confirm-audio", trip_url(&trip.slug))).into_response())
}

pub async fn confirm_audio(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    let entries: Vec<ExtractedRecommendation> =
        session::get(&session, session::EXTRACTED_RECOMMENDATIONS)
            .await?
            .unwrap_or_default();
    if entries.is_empty() {
        return redirect_with_error(
            &session,
            "No recommendations found. Please try recording again.",
            &add_url(&trip.slug),
        )
        .await;
    }
    let recommender_name: Option<String> = session::get(&session, session::RECOMMENDER_NAME).await?;

    Ok(Html(render_confirm_page(
        &chrome(&session).await,
        &trip,
        &entries,
        recommender_name.as_deref(),
    ))
    .into_response())
}

/// The confirmation form posts parallel `name[]` lists, which `Form` cannot express, so
/// the body is decoded by hand.
pub async fn save(
    State(ctx): State<AppContext>,
    session: Session,
    Path(slug): Path<String>,
    body: Bytes,
) -> PageResult {
    let trip = ctx.manage_trips.find_by_slug(&slug).await?;
    let (entries, recommender_name) = parse_confirmed_entries(&body);

    let signed_in = session::current_user_id(&session).await?;
    match ctx
        .save_recommendations
        .execute(&trip, entries, recommender_name.as_deref(), signed_in)
        .await
    {
        Ok(_) => {
            session::take::<Vec<ExtractedRecommendation>>(&session, session::EXTRACTED_RECOMMENDATIONS).await?;
            session::take::<String>(&session, session::RECOMMENDER_NAME).await?;
            Ok(Redirect::to(&format!("{}/thank-you", trip_url(&trip.slug))).into_response())
        }
        Err(AppError::Validation(message)) => {
            redirect_with_error(&session, message, &add_url(&trip.slug)).await
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn parse_confirmed_entries(body: &[u8]) -> (Vec<RecommendationEntry>, Option<String>) {
    let mut names = Vec::new();
    let mut descriptions = Vec::new();
    let mut place_types = Vec::new();
    let mut website_urls = Vec::new();
    let mut recommender_name = None;

    for (key, value) in url::form_urlencoded::parse(body) {
        let value = value.into_owned();
        match key.as_ref() {
            "recommendations[]" => names.push(value),
            "descriptions[]" => descriptions.push(value),
            "place_types[]" => place_types.push(value),
            "website_urls[]" => website_urls.push(value),
            "recommender_name" => recommender_name = Some(value),
            _ => {}
        }
    }

    let column = |values: &[String], i: usize| {
        values
            .get(i)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let entries = names
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.trim().is_empty())
        .map(|(i, name)| RecommendationEntry {
            name: name.trim().to_string(),
            category: column(&place_types, i),
            website_url: column(&website_urls, i),
            description: column(&descriptions, i),
        })
        .collect();

    (entries, non_blank(recommender_name.as_deref()).map(str::to_string))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_lists_are_zipped_by_position() {
        let body = b"recommendations%5B%5D=Ancient+Agora&place_types%5B%5D=Historical+Site\
&website_urls%5B%5D=&descriptions%5B%5D=Go+early\
&recommendations%5B%5D=Kostas&place_types%5B%5D=Restaurant\
&website_urls%5B%5D=https%3A%2F%2Fkostas.example&descriptions%5B%5D=\
&recommender_name=Bo";
        let (entries, name) = parse_confirmed_entries(body);

        assert_eq!(name.as_deref(), Some("Bo"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Ancient Agora");
        assert_eq!(entries[0].category.as_deref(), Some("Historical Site"));
        assert_eq!(entries[0].website_url, None);
        assert_eq!(entries[0].description.as_deref(), Some("Go early"));
        assert_eq!(entries[1].website_url.as_deref(), Some("https://kostas.example"));
        assert_eq!(entries[1].description, None);
    }

    #[test]
    fn test_blank_names_are_dropped() {
        let body = b"recommendations[]=&descriptions[]=x&recommendations[]=Plaka&recommender_name=+";
        let (entries, name) = parse_confirmed_entries(body);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Plaka");
        assert_eq!(entries[0].description, None);
        assert_eq!(name, None);
    }
}
