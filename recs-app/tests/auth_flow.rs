mod common;

use chrono::{Duration, Utc};
use recs_app::domain::{generate_token, TOKEN_LENGTH};
use recs_app::infrastructure::db::{AuthTokenRepository, UserRepository};
use recs_errors::AppError;

#[tokio::test]
async fn test_first_login_creates_user_and_repeats_reuse_it() {
    let ctx = common::offline_context().await;
    let users = UserRepository::new(ctx.db.clone());

    let first = ctx.auth.request_login("  Ana@Example.com ").await.unwrap();
    let second = ctx.auth.request_login("ana@example.com").await.unwrap();

    assert_eq!(first.email, "ana@example.com");
    assert_ne!(first.token, second.token);
    assert_eq!(first.token.len(), TOKEN_LENGTH);
    assert_eq!(first.url, format!("http://recs.test/auth/verify/{}", first.token));

    let all = users.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, "ana@example.com");
}

#[tokio::test]
async fn test_token_is_accepted_once() {
    let ctx = common::offline_context().await;
    let link = ctx.auth.request_login("bo@example.com").await.unwrap();

    let user = ctx.auth.verify(&link.token).await.unwrap();
    assert_eq!(user.email, "bo@example.com");
    assert!(user.last_login_at.is_some());

    let again = ctx.auth.verify(&link.token).await;
    assert_eq!(again.unwrap_err(), AppError::InvalidToken);
}

#[tokio::test]
async fn test_expired_and_unknown_tokens_are_rejected() {
    let ctx = common::offline_context().await;
    let users = UserRepository::new(ctx.db.clone());
    let tokens = AuthTokenRepository::new(ctx.db.clone());

    let user = users.create("cy@example.com", Some("Cy")).await.unwrap();
    let token = generate_token();
    tokens
        .create(user.id, &token, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    assert_eq!(ctx.auth.verify(&token).await.unwrap_err(), AppError::InvalidToken);
    assert_eq!(ctx.auth.verify("not-a-token").await.unwrap_err(), AppError::InvalidToken);

    let stored = tokens.find_by_token(&token).await.unwrap().unwrap();
    assert!(!stored.used);
}

#[tokio::test]
async fn test_login_requests_are_rate_limited_per_email() {
    let ctx = common::offline_context().await;

    for _ in 0..3 {
        ctx.auth.request_login("dee@example.com").await.unwrap();
    }
    let limited = ctx.auth.request_login("dee@example.com").await;
    assert!(matches!(limited, Err(AppError::RateLimited(_))));

    assert!(ctx.auth.request_login("eve@example.com").await.is_ok());
}

#[tokio::test]
async fn test_invalid_email_is_a_validation_error() {
    let ctx = common::offline_context().await;
    let result = ctx.auth.request_login("not-an-email").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_cleanup_removes_only_expired_tokens() {
    let ctx = common::offline_context().await;
    let users = UserRepository::new(ctx.db.clone());
    let tokens = AuthTokenRepository::new(ctx.db.clone());
    let user = users.create("fay@example.com", None).await.unwrap();

    let expired = generate_token();
    tokens
        .create(user.id, &expired, Utc::now() - Duration::minutes(30))
        .await
        .unwrap();
    let live = ctx.auth.issue_link(&user).await.unwrap();

    let removed = ctx.auth.cleanup_expired_tokens().await.unwrap();

    assert_eq!(removed, 1);
    assert!(tokens.find_by_token(&expired).await.unwrap().is_none());
    assert!(tokens.find_by_token(&live.token).await.unwrap().is_some());
}
