use super::db_error;
use super::passwordless_auth::PasswordlessAuth;
use crate::domain::{base_slug, new_share_token, slug_candidate, DestinationSuggestion, LoginLink};
use crate::infrastructure::db::entities::{trip, user};
use crate::infrastructure::db::{DestinationRepository, NewTrip, TripRepository, UserRepository};
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::security::InputSanitizer;
use chrono::Utc;
use recs_errors::AppError;
use std::sync::Arc;

const MAX_SLUG_ATTEMPTS: u32 = 1000;
const MAX_SHARE_TOKEN_ATTEMPTS: u32 = 20;

/// What the traveler typed in the wizard.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub destination: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug)]
pub enum TripOutcome {
    /// The email belongs to a user stored under another name.
    NeedsNameResolution { previous_name: String },
    /// The trip exists and the user may be signed in right away.
    SignedIn { user: user::Model, trip: trip::Model },
    /// The trip exists but the known user must prove ownership of the email first.
    VerificationRequired { trip: trip::Model, link: LoginLink },
}

pub struct CreateTrip {
    users: UserRepository,
    trips: TripRepository,
    destinations: DestinationRepository,
    ai: Option<Arc<OpenAiClient>>,
    auth: Arc<PasswordlessAuth>,
}

impl CreateTrip {
    pub fn new(
        users: UserRepository,
        trips: TripRepository,
        destinations: DestinationRepository,
        ai: Option<Arc<OpenAiClient>>,
        auth: Arc<PasswordlessAuth>,
    ) -> Self {
        Self {
            users,
            trips,
            destinations,
            ai,
            auth,
        }
    }

    /// Second wizard step: resolves the traveler's identity and creates the trip.
    pub async fn complete_trip(&self, request: TripRequest) -> Result<TripOutcome, AppError> {
        let request = validate(request)?;

        let existing = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(db_error)?;

        match existing {
            Some(user) => match user.name.as_deref() {
                Some(stored) if stored != request.name => Ok(TripOutcome::NeedsNameResolution {
                    previous_name: stored.to_string(),
                }),
                Some(_) => {
                    let trip = self
                        .create_trip_for_user(&user, &request.destination, &request.name)
                        .await?;
                    let link = self.auth.issue_link(&user).await?;
                    Ok(TripOutcome::VerificationRequired { trip, link })
                }
                None => {
                    let user = self
                        .users
                        .update_name(user, &request.name)
                        .await
                        .map_err(db_error)?;
                    self.sign_in_with_new_trip(user, &request).await
                }
            },
            None => {
                let user = self
                    .users
                    .create(&request.email, Some(&request.name))
                    .await
                    .map_err(db_error)?;
                tracing::info!(user_id = %user.id, "Created user from trip wizard");
                self.sign_in_with_new_trip(user, &request).await
            }
        }
    }

    /// Name-conflict step. `request.name` carries the name the traveler settled on.
    pub async fn resolve_name(&self, request: TripRequest) -> Result<TripOutcome, AppError> {
        let request = validate(request)?;

        let existing = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(db_error)?;

        match existing {
            Some(user) => {
                let user = self
                    .users
                    .update_name(user, &request.name)
                    .await
                    .map_err(db_error)?;
                let trip = self
                    .create_trip_for_user(&user, &request.destination, &request.name)
                    .await?;
                let link = self.auth.issue_link(&user).await?;
                Ok(TripOutcome::VerificationRequired { trip, link })
            }
            None => {
                let user = self
                    .users
                    .create(&request.email, Some(&request.name))
                    .await
                    .map_err(db_error)?;
                self.sign_in_with_new_trip(user, &request).await
            }
        }
    }

    /// Name stored for `email`, if the address is known.
    pub async fn registered_name(&self, email: &str) -> Result<Option<String>, AppError> {
        let user = self.users.find_by_email(email).await.map_err(db_error)?;
        Ok(user.and_then(|u| u.name))
    }

    /// Creates a trip with a unique slug and share token for an already known user.
    pub async fn create_trip_for_user(
        &self,
        user: &user::Model,
        destination: &str,
        traveler_name: &str,
    ) -> Result<trip::Model, AppError> {
        let destination = destination.trim();
        let slug = self.unique_slug(destination).await?;
        let share_token = self.unique_share_token().await?;

        let suggestions = self.destination_suggestions(destination).await;
        let primary = suggestions.first();
        let destination_id = self
            .destinations
            .find_by_name(destination)
            .await
            .map_err(db_error)?
            .map(|d| d.id);

        let new_trip = NewTrip {
            destination: destination.to_string(),
            traveler_name: traveler_name.trim().to_string(),
            share_token,
            slug,
            user_id: user.id,
            destination_id,
            destination_display_name: primary.map(|s| s.name.clone()),
            destination_country: primary.and_then(|s| s.country.clone()),
            destination_info: if suggestions.is_empty() {
                None
            } else {
                serde_json::to_value(&suggestions).ok()
            },
        };

        let trip = self.trips.create(new_trip).await.map_err(db_error)?;
        tracing::info!(trip_id = %trip.id, slug = %trip.slug, "Created trip");
        Ok(trip)
    }

    async fn sign_in_with_new_trip(
        &self,
        user: user::Model,
        request: &TripRequest,
    ) -> Result<TripOutcome, AppError> {
        self.auth.sign_in_directly(&user).await?;
        let trip = self
            .create_trip_for_user(&user, &request.destination, &request.name)
            .await?;
        Ok(TripOutcome::SignedIn { user, trip })
    }

    async fn unique_slug(&self, destination: &str) -> Result<String, AppError> {
        let base = base_slug(destination, Utc::now().date_naive());
        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let candidate = slug_candidate(&base, attempt);
            if !self.trips.slug_exists(&candidate).await.map_err(db_error)? {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal(format!("no free slug for {base}")))
    }

    async fn unique_share_token(&self) -> Result<String, AppError> {
        for _ in 0..MAX_SHARE_TOKEN_ATTEMPTS {
            let token = new_share_token();
            if !self
                .trips
                .share_token_exists(&token)
                .await
                .map_err(db_error)?
            {
                return Ok(token);
            }
        }
        Err(AppError::Internal("no free share token".to_string()))
    }

    async fn destination_suggestions(&self, destination: &str) -> Vec<DestinationSuggestion> {
        let Some(ai) = &self.ai else {
            return Vec::new();
        };
        match ai.destination_suggestions(destination).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::warn!("Destination suggestions unavailable for {}: {}", destination, err);
                Vec::new()
            }
        }
    }
}

fn validate(request: TripRequest) -> Result<TripRequest, AppError> {
    Ok(TripRequest {
        destination: InputSanitizer::validate_destination(&request.destination)?,
        name: InputSanitizer::validate_name(&request.name)?,
        email: InputSanitizer::validate_email(&request.email)?,
    })
}
