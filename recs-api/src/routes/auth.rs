use super::{chrome, redirect_with_error, PageResult};
use crate::flash;
use crate::session;
use crate::views::{render_check_email_page, render_login_page};
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use recs_app::AppContext;
use recs_errors::AppError;
use serde::Deserialize;
use tower_sessions::Session;

const DEFAULT_AFTER_LOGIN: &str = "/my-trips";

#[derive(Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    next: Option<String>,
}

/// Only same-site paths are accepted as post-login targets.
pub(crate) fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim)
        .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

pub async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> PageResult {
    if let Some(next) = safe_next(query.next.as_deref()) {
        session::set(&session, session::AUTH_NEXT, next).await?;
    }
    Ok(Html(render_login_page(
        &chrome(&session).await,
        safe_next(query.next.as_deref()),
    ))
    .into_response())
}

pub async fn request_login(
    State(ctx): State<AppContext>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> PageResult {
    if let Some(next) = safe_next(form.next.as_deref()) {
        session::set(&session, session::AUTH_NEXT, next).await?;
    }

    match ctx.auth.request_login(&form.email).await {
        Ok(link) => {
            let shown_link = ctx.config.show_login_links().then_some(link.url.as_str());
            Ok(Html(render_check_email_page(
                &chrome(&session).await,
                &link.email,
                None,
                shown_link,
            ))
            .into_response())
        }
        Err(
            err @ (AppError::Validation(_) | AppError::RateLimited(_) | AppError::EmailDelivery(_)),
        ) => redirect_with_error(&session, err.user_message(), "/auth/login").await,
        Err(err) => Err(err.into()),
    }
}

pub async fn verify(
    State(ctx): State<AppContext>,
    session: Session,
    Path(token): Path<String>,
) -> PageResult {
    match ctx.auth.verify(&token).await {
        Ok(user) => {
            let next: Option<String> = session::take(&session, session::AUTH_NEXT).await?;
            session::sign_in(&session, &user).await?;
            flash::success(&session, "You are now logged in.").await?;
            let target = safe_next(next.as_deref()).unwrap_or(DEFAULT_AFTER_LOGIN);
            Ok(Redirect::to(target).into_response())
        }
        Err(err @ AppError::InvalidToken) => {
            redirect_with_error(&session, err.user_message(), "/auth/login").await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(session: Session) -> PageResult {
    session::sign_out(&session).await?;
    flash::push(&session, flash::FlashKind::Info, "You have been logged out.").await?;
    Ok(Redirect::to("/").into_response())
}
