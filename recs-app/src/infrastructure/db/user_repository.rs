use super::entities::{user, User};
use super::is_unique_violation;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
    }

    pub async fn create(&self, email: &str, name: Option<&str>) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        let active = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(normalize_email(email)),
            name: Set(name.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };
        active.insert(&self.db).await
    }

    /// Returns the user for `email`, creating it on first sight. The flag is true when
    /// a new row was inserted.
    pub async fn get_or_create(&self, email: &str) -> Result<(user::Model, bool), DbErr> {
        if let Some(existing) = self.find_by_email(email).await? {
            return Ok((existing, false));
        }

        match self.create(email, None).await {
            Ok(created) => Ok((created, true)),
            // Lost a race against a concurrent insert of the same email.
            Err(err) if is_unique_violation(&err) => self
                .find_by_email(email)
                .await?
                .map(|u| (u, false))
                .ok_or(err),
            Err(err) => Err(err),
        }
    }

    pub async fn update_name(&self, existing: user::Model, name: &str) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = existing.into();
        active.name = Set(Some(name.to_string()));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), DbErr> {
        let now = Utc::now();
        User::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(now))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
