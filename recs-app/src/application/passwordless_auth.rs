use super::db_error;
use crate::domain::{generate_token, LoginLink, TOKEN_TTL_MINUTES};
use crate::infrastructure::db::entities::user;
use crate::infrastructure::db::{AuthTokenRepository, UserRepository};
use crate::infrastructure::email::{login_email, EmailSender};
use crate::infrastructure::security::{InputSanitizer, RateLimiter};
use chrono::{Duration, Utc};
use recs_errors::AppError;
use std::sync::Arc;

pub struct PasswordlessAuth {
    users: UserRepository,
    tokens: AuthTokenRepository,
    mailer: Arc<EmailSender>,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl PasswordlessAuth {
    pub fn new(
        users: UserRepository,
        tokens: AuthTokenRepository,
        mailer: Arc<EmailSender>,
        base_url: String,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            rate_limiter: RateLimiter::new(),
            base_url,
        }
    }

    /// Validates the address, creates the user on first sight and sends a login link.
    pub async fn request_login(&self, email: &str) -> Result<LoginLink, AppError> {
        let email = InputSanitizer::validate_email(email)?;
        if let Err(err) = self.rate_limiter.check_rate_limit(&email) {
            tracing::warn!(email = %email, "Login request throttled: {}", err);
            return Err(err.into());
        }

        let (user, created) = self.users.get_or_create(&email).await.map_err(db_error)?;
        if created {
            tracing::info!(user_id = %user.id, "Created user on login request");
        }

        self.issue_link(&user).await
    }

    /// Stores a fresh token for `user` and delivers the verification link.
    pub async fn issue_link(&self, user: &user::Model) -> Result<LoginLink, AppError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
        self.tokens
            .create(user.id, &token, expires_at)
            .await
            .map_err(db_error)?;

        let link = LoginLink {
            email: user.email.clone(),
            url: format!("{}/auth/verify/{}", self.base_url, token),
            token,
            expires_at,
        };

        if !self.mailer.delivers_for_real() {
            tracing::info!(email = %link.email, "Login link: {}", link.url);
        }

        if let Err(err) = self.mailer.send(&login_email(&link.email, &link.url)).await {
            tracing::error!(email = %link.email, "Failed to send login email: {}", err);
            return Err(err);
        }

        Ok(link)
    }

    /// Consumes the token and returns its owner. Unknown, used and expired tokens are
    /// all rejected the same way.
    pub async fn verify(&self, token: &str) -> Result<user::Model, AppError> {
        let consumed = self
            .tokens
            .consume(token.trim(), Utc::now())
            .await
            .map_err(db_error)?
            .ok_or(AppError::InvalidToken)?;

        self.users
            .touch_last_login(consumed.user_id)
            .await
            .map_err(db_error)?;

        let user = self
            .users
            .find_by_id(consumed.user_id)
            .await
            .map_err(db_error)?
            .ok_or(AppError::InvalidToken)?;

        tracing::info!(user_id = %user.id, "User signed in with login link");
        Ok(user)
    }

    /// Marks a user as signed in without a token, for identities created in the wizard.
    pub async fn sign_in_directly(&self, user: &user::Model) -> Result<(), AppError> {
        self.users.touch_last_login(user.id).await.map_err(db_error)
    }

    pub async fn cleanup_expired_tokens(&self) -> Result<u64, AppError> {
        let removed = self
            .tokens
            .delete_expired(Utc::now())
            .await
            .map_err(db_error)?;
        tracing::info!("Removed {} expired login tokens", removed);
        Ok(removed)
    }
}
