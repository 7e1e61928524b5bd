use super::entities::{auth_token, AuthToken};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthTokenRepository {
    db: DatabaseConnection,
}

impl AuthTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<auth_token::Model, DbErr> {
        let active = auth_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            used: Set(false),
            created_at: Set(Utc::now()),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<auth_token::Model>, DbErr> {
        AuthToken::find()
            .filter(auth_token::Column::Token.eq(token))
            .one(&self.db)
            .await
    }

    /// Flips `used` from false to true in one conditional update. Returns the token only
    /// when this call performed the transition, so concurrent verifications of the same
    /// link cannot both succeed.
    pub async fn consume(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<auth_token::Model>, DbErr> {
        let result = AuthToken::update_many()
            .col_expr(auth_token::Column::Used, Expr::value(true))
            .filter(auth_token::Column::Token.eq(token))
            .filter(auth_token::Column::Used.eq(false))
            .filter(auth_token::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await?;

        if result.rows_affected != 1 {
            return Ok(None);
        }
        self.find_by_token(token).await
    }

    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = AuthToken::delete_many()
            .filter(auth_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
