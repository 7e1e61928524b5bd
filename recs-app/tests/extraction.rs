mod common;

use recs_app::domain::ExtractedRecommendation;
use recs_errors::AppError;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEXT: &str = "You must see the Ancient Agora early in the morning. Eat at Kostas in Plaka.";

async fn extractor_replying(template: ResponseTemplate) -> (MockServer, recs_app::AppContext) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(template)
        .mount(&server)
        .await;
    let ctx = common::context_with(Some(server.uri()), None).await;
    (server, ctx)
}

#[tokio::test]
async fn test_structured_reply_becomes_entries() {
    let reply = json!([
        { "name": "Ancient Agora", "type": "Historical Site", "website_url": "", "description": "Go early" },
        { "name": "Kostas", "type": "Restaurant", "description": "Souvlaki in Plaka" }
    ])
    .to_string();
    let (_server, ctx) =
        extractor_replying(ResponseTemplate::new(200).set_body_json(common::chat_reply(&reply))).await;

    let entries = ctx.extract_recommendations.execute(TEXT, "Athens").await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "Ancient Agora");
    assert_eq!(entries[0].category.as_deref(), Some("Historical Site"));
    assert_eq!(entries[1].description.as_deref(), Some("Souvlaki in Plaka"));
}

#[tokio::test]
async fn test_array_wrapped_in_prose_is_still_parsed() {
    let reply = "Sure! Here is the list:\n```json\n[{\"name\": \"Plaka\", \"type\": \"Neighborhood\"}]\n```";
    let (_server, ctx) =
        extractor_replying(ResponseTemplate::new(200).set_body_json(common::chat_reply(reply))).await;

    let entries = ctx.extract_recommendations.execute(TEXT, "Athens").await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Plaka");
}

#[tokio::test]
async fn test_provider_error_falls_back_to_catch_all() {
    let (_server, ctx) = extractor_replying(ResponseTemplate::new(500)).await;

    let entries = ctx.extract_recommendations.execute(TEXT, "Athens").await.unwrap();

    assert_eq!(entries, vec![ExtractedRecommendation::catch_all("Athens", TEXT)]);
}

#[tokio::test]
async fn test_reply_without_named_entries_falls_back_to_catch_all() {
    let (_server, ctx) = extractor_replying(
        ResponseTemplate::new(200).set_body_json(common::chat_reply(r#"[{"name": "  "}]"#)),
    )
    .await;

    let entries = ctx.extract_recommendations.execute(TEXT, "Athens").await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Recommendations for Athens");
}

#[tokio::test]
async fn test_without_ai_text_is_kept_verbatim() {
    let ctx = common::offline_context().await;

    let entries = ctx.extract_recommendations.execute(TEXT, "Athens").await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category.as_deref(), Some("Other"));
    assert_eq!(entries[0].description.as_deref(), Some(TEXT));
    assert!(!ctx.extract_recommendations.transcription_available());
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let ctx = common::offline_context().await;
    let result = ctx.extract_recommendations.execute("  \n ", "Athens").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_transcription_returns_provider_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "text": "Visit the Acropolis at sunset." })),
        )
        .mount(&server)
        .await;
    let ctx = common::context_with(Some(server.uri()), None).await;

    let text = ctx
        .extract_recommendations
        .transcribe(vec![1, 2, 3, 4], "recording.webm", "audio/webm")
        .await
        .unwrap();

    assert_eq!(text, "Visit the Acropolis at sunset.");
}

#[tokio::test]
async fn test_transcription_without_key_or_audio_fails() {
    let ctx = common::offline_context().await;

    let empty = ctx
        .extract_recommendations
        .transcribe(Vec::new(), "recording.webm", "audio/webm")
        .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    let no_key = ctx
        .extract_recommendations
        .transcribe(vec![1], "recording.webm", "audio/webm")
        .await;
    assert!(matches!(no_key, Err(AppError::Transcription(_))));
}
