mod common;

use recs_app::application::{RecommendationEntry, ANONYMOUS_EMAIL};
use recs_app::domain::ActivityCandidate;
use recs_app::infrastructure::db::entities::{trip, user};
use recs_app::infrastructure::db::{
    ActivityRepository, NewRecommendation, RecommendationRepository, SubscriptionRepository,
    UserRepository,
};
use recs_app::AppContext;
use recs_errors::AppError;
use uuid::Uuid;

fn entry(name: &str, description: Option<&str>) -> RecommendationEntry {
    RecommendationEntry {
        name: name.to_string(),
        category: None,
        website_url: None,
        description: description.map(str::to_string),
    }
}

async fn trip_for(ctx: &AppContext, email: &str) -> (user::Model, trip::Model) {
    let users = UserRepository::new(ctx.db.clone());
    let owner = users.create(email, Some("Owner")).await.unwrap();
    let trip = ctx
        .create_trip
        .create_trip_for_user(&owner, "Athens", "Owner")
        .await
        .unwrap();
    (owner, trip)
}

#[tokio::test]
async fn test_named_recommender_gets_throwaway_user() {
    let ctx = common::offline_context().await;
    let (_, trip) = trip_for(&ctx, "owner@example.com").await;
    let recommendations = RecommendationRepository::new(ctx.db.clone());
    let users = UserRepository::new(ctx.db.clone());

    let saved = ctx
        .save_recommendations
        .execute(
            &trip,
            vec![entry("Ancient Agora", Some("Go early")), entry("  ", None), entry("Plaka", Some("  "))],
            Some("Bo"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(saved, 2);
    let stored = recommendations.list_for_trip(trip.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|r| r.author_id == stored[0].author_id));
    assert!(stored.iter().any(|r| r.description.is_none()));

    let author = users.find_by_id(stored[0].author_id).await.unwrap().unwrap();
    assert_eq!(author.name.as_deref(), Some("Bo"));
    assert!(author.email.starts_with("temp_"));
    assert!(author.email.ends_with("@example.com"));
}

#[tokio::test]
async fn test_unnamed_recommendations_share_the_anonymous_user() {
    let ctx = common::offline_context().await;
    let (_, trip) = trip_for(&ctx, "owner@example.com").await;
    let users = UserRepository::new(ctx.db.clone());

    ctx.save_recommendations
        .execute(&trip, vec![entry("Lycabettus Hill", None)], None, None)
        .await
        .unwrap();
    ctx.save_recommendations
        .execute(&trip, vec![entry("Monastiraki", None)], Some("   "), None)
        .await
        .unwrap();

    let anonymous = users.find_by_email(ANONYMOUS_EMAIL).await.unwrap().unwrap();
    assert_eq!(anonymous.name.as_deref(), Some("Anonymous User"));

    let details = ctx.manage_trips.recommendations_for(&trip).await.unwrap();
    assert_eq!(details.len(), 2);
    assert!(details
        .iter()
        .all(|r| r.author_name.as_deref() == Some("Anonymous User")));
}

#[tokio::test]
async fn test_signed_in_contributor_is_the_author() {
    let ctx = common::offline_context().await;
    let (_, trip) = trip_for(&ctx, "owner@example.com").await;
    let users = UserRepository::new(ctx.db.clone());
    let friend = users.create("friend@example.com", Some("Friend")).await.unwrap();

    ctx.save_recommendations
        .execute(&trip, vec![entry("Acropolis Museum", None)], Some("Someone else"), Some(friend.id))
        .await
        .unwrap();

    let stored = RecommendationRepository::new(ctx.db.clone())
        .list_for_trip(trip.id)
        .await
        .unwrap();
    assert_eq!(stored[0].author_id, friend.id);
    assert_eq!(users.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_same_place_on_two_trips_shares_one_activity() {
    let ctx = common::offline_context().await;
    let (_, athens) = trip_for(&ctx, "a@example.com").await;
    let (_, second) = trip_for(&ctx, "b@example.com").await;

    ctx.save_recommendations
        .execute(&athens, vec![entry("Acropolis", None)], None, None)
        .await
        .unwrap();
    ctx.save_recommendations
        .execute(&second, vec![entry("acropolis", None)], None, None)
        .await
        .unwrap();

    let activities = ActivityRepository::new(ctx.db.clone()).list_all().await.unwrap();
    assert_eq!(activities.len(), 1);
}

#[tokio::test]
async fn test_nothing_to_save_is_a_validation_error() {
    let ctx = common::offline_context().await;
    let (_, trip) = trip_for(&ctx, "owner@example.com").await;

    let result = ctx
        .save_recommendations
        .execute(&trip, vec![entry(" ", Some("orphan"))], Some("Bo"), None)
        .await;

    assert_eq!(
        result.unwrap_err(),
        AppError::Validation("Please add at least one recommendation.".to_string())
    );
}

#[tokio::test]
async fn test_owner_can_remove_a_recommendation() {
    let ctx = common::offline_context().await;
    let (owner, trip) = trip_for(&ctx, "owner@example.com").await;
    let recommendations = RecommendationRepository::new(ctx.db.clone());

    ctx.save_recommendations
        .execute(&trip, vec![entry("Psyrri", None)], None, None)
        .await
        .unwrap();
    let stored = recommendations.list_for_trip(trip.id).await.unwrap();

    let stranger = UserRepository::new(ctx.db.clone())
        .create("stranger@example.com", None)
        .await
        .unwrap();
    let denied = ctx
        .manage_trips
        .delete_recommendation(stranger.id, &trip.slug, stored[0].id)
        .await;
    assert!(matches!(denied, Err(AppError::NotFound(_))));

    ctx.manage_trips
        .delete_recommendation(owner.id, &trip.slug, stored[0].id)
        .await
        .unwrap();
    assert!(recommendations.list_for_trip(trip.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_subscribing_twice_is_idempotent() {
    let ctx = common::offline_context().await;
    let (_, trip) = trip_for(&ctx, "owner@example.com").await;
    let subscriptions = SubscriptionRepository::new(ctx.db.clone());

    assert!(ctx.save_recommendations.subscribe(&trip, "Fan@Example.com").await.unwrap());
    assert!(!ctx.save_recommendations.subscribe(&trip, "fan@example.com").await.unwrap());
    assert_eq!(subscriptions.list_for_trip(trip.id).await.unwrap().len(), 1);

    let invalid = ctx.save_recommendations.subscribe(&trip, "nope").await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_subscribers_are_notified_once() {
    let ctx = common::offline_context().await;
    let (_, trip) = trip_for(&ctx, "owner@example.com").await;
    ctx.save_recommendations.subscribe(&trip, "one@example.com").await.unwrap();
    ctx.save_recommendations.subscribe(&trip, "two@example.com").await.unwrap();

    let first = ctx.maintenance.notify_subscribers(&trip.slug).await.unwrap();
    assert_eq!(first.sent, 2);
    assert_eq!(first.failed, 0);

    let second = ctx.maintenance.notify_subscribers(&trip.slug).await.unwrap();
    assert_eq!(second.sent, 0);

    let missing = ctx.maintenance.notify_subscribers("no-such-trip").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_failed_batch_stores_nothing() {
    let ctx = common::offline_context().await;
    let (owner, trip) = trip_for(&ctx, "owner@example.com").await;
    let recommendations = RecommendationRepository::new(ctx.db.clone());
    let plaka = ActivityRepository::new(ctx.db.clone())
        .create_bare(&ActivityCandidate::new("Plaka"))
        .await
        .unwrap();

    let batch = vec![
        NewRecommendation {
            activity_id: plaka.id,
            description: Some("Walk it at dusk".to_string()),
        },
        NewRecommendation {
            activity_id: Uuid::new_v4(),
            description: None,
        },
    ];
    let result = recommendations.create_batch(trip.id, owner.id, batch).await;

    assert!(result.is_err());
    assert!(recommendations.list_for_trip(trip.id).await.unwrap().is_empty());
}
