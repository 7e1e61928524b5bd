use recs_app::domain::ExtractedRecommendation;
use recs_app::infrastructure::db::entities::user;
use recs_errors::AppError;
use serde::{de::DeserializeOwned, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

pub const USER_ID: &str = "user_id";
pub const USER_EMAIL: &str = "user_email";
pub const AUTH_NEXT: &str = "auth_next";
pub const TEMP_DESTINATION: &str = "temp_destination";
pub const TEMP_EMAIL: &str = "temp_email";
pub const TEMP_NAME: &str = "temp_name";
pub const EXTRACTED_RECOMMENDATIONS: &str = "extracted_recommendations";
pub const RECOMMENDER_NAME: &str = "recommender_name";

fn session_error(err: tower_sessions::session::Error) -> AppError {
    tracing::error!("Session error: {}", err);
    AppError::Session(err.to_string())
}

pub async fn get<T: DeserializeOwned>(session: &Session, key: &str) -> Result<Option<T>, AppError> {
    session.get(key).await.map_err(session_error)
}

pub async fn set<T: Serialize>(session: &Session, key: &str, value: T) -> Result<(), AppError> {
    session.insert(key, value).await.map_err(session_error)
}

pub async fn take<T: DeserializeOwned>(session: &Session, key: &str) -> Result<Option<T>, AppError> {
    session.remove(key).await.map_err(session_error)
}

pub async fn current_user_id(session: &Session) -> Result<Option<Uuid>, AppError> {
    get(session, USER_ID).await
}

/// Rotates the session id and stores the user.
pub async fn sign_in(session: &Session, user: &user::Model) -> Result<(), AppError> {
    session.cycle_id().await.map_err(session_error)?;
    set(session, USER_ID, user.id).await?;
    set(session, USER_EMAIL, &user.email).await
}

pub async fn sign_out(session: &Session) -> Result<(), AppError> {
    session.flush().await.map_err(session_error)
}

/// Wizard values carried from step to step.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub destination: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl WizardState {
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        Ok(Self {
            destination: get(session, TEMP_DESTINATION).await?,
            email: get(session, TEMP_EMAIL).await?,
            name: get(session, TEMP_NAME).await?,
        })
    }

    pub async fn store(&self, session: &Session) -> Result<(), AppError> {
        if let Some(destination) = &self.destination {
            set(session, TEMP_DESTINATION, destination).await?;
        }
        if let Some(email) = &self.email {
            set(session, TEMP_EMAIL, email).await?;
        }
        if let Some(name) = &self.name {
            set(session, TEMP_NAME, name).await?;
        }
        Ok(())
    }

    pub async fn clear(session: &Session) -> Result<(), AppError> {
        take::<String>(session, TEMP_DESTINATION).await?;
        take::<String>(session, TEMP_EMAIL).await?;
        take::<String>(session, TEMP_NAME).await?;
        Ok(())
    }
}

pub async fn store_extracted(
    session: &Session,
    entries: &[ExtractedRecommendation],
    recommender_name: Option<&str>,
) -> Result<(), AppError> {
    set(session, EXTRACTED_RECOMMENDATIONS, entries).await?;
    match recommender_name {
        Some(name) => set(session, RECOMMENDER_NAME, name).await,
        None => take::<String>(session, RECOMMENDER_NAME).await.map(|_| ()),
    }
}
