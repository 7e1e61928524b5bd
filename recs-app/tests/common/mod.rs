#![allow(dead_code)]

use recs_app::infrastructure::db::{create_connection, run_migrations};
use recs_app::infrastructure::email::EmailSender;
use recs_app::infrastructure::openai::OpenAiClient;
use recs_app::infrastructure::places::{GooglePlacesClient, NominatimClient};
use recs_app::{AppConfig, AppContext, Clients};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub async fn test_db() -> DatabaseConnection {
    let db = create_connection("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&db).await.expect("Failed to run migrations");
    db
}

/// Context with every outbound service switched off.
pub async fn offline_context() -> AppContext {
    AppContext::new(AppConfig::for_tests(), test_db().await, Clients::offline())
}

/// Context whose OpenAI and Google clients talk to the given fake servers.
pub async fn context_with(openai_url: Option<String>, google_url: Option<String>) -> AppContext {
    let clients = Clients {
        openai: openai_url
            .map(|url| Arc::new(OpenAiClient::with_base_url("sk-test".to_string(), url))),
        google_places: google_url
            .map(|url| Arc::new(GooglePlacesClient::with_base_url("g-test".to_string(), url))),
        nominatim: Arc::new(NominatimClient::new()),
        mailer: Arc::new(EmailSender::Console),
    };
    AppContext::new(AppConfig::for_tests(), test_db().await, clients)
}

pub fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}
