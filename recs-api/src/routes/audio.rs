use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recs_app::AppContext;
use recs_errors::AppError;
use serde_json::json;

const DEFAULT_FILE_NAME: &str = "recording.webm";
const DEFAULT_CONTENT_TYPE: &str = "audio/webm";
/// Matches the transcription provider's own upload cap.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

struct AudioUpload {
    bytes: Vec<u8>,
    file_name: String,
    content_type: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "error": message }))).into_response()
}

/// Multipart `audio` + `destination` in, `{"status":"success","transcription":...}` out.
pub async fn transcribe(State(ctx): State<AppContext>, mut multipart: Multipart) -> Response {
    let mut audio: Option<AudioUpload> = None;
    let mut destination = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("Malformed transcription upload: {}", err);
                return error_response(StatusCode::BAD_REQUEST, "Invalid upload");
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .unwrap_or(DEFAULT_FILE_NAME)
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        audio = Some(AudioUpload {
                            bytes: bytes.to_vec(),
                            file_name,
                            content_type,
                        })
                    }
                    Err(err) => {
                        tracing::warn!("Failed to read audio upload: {}", err);
                        return error_response(StatusCode::BAD_REQUEST, "Invalid upload");
                    }
                }
            }
            "destination" => {
                destination = field.text().await.unwrap_or_default();
            }
            _ => {}
        }
    }

    let Some(audio) = audio else {
        return error_response(StatusCode::BAD_REQUEST, "No audio file provided");
    };
    if destination.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No destination provided");
    }
    if audio.bytes.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Audio file is empty");
    }
    if !ctx.extract_recommendations.transcription_available() {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured");
    }

    tracing::info!(
        destination = %destination.trim(),
        bytes = audio.bytes.len(),
        "Transcribing {}",
        audio.file_name
    );

    match ctx
        .extract_recommendations
        .transcribe(audio.bytes, &audio.file_name, &audio.content_type)
        .await
    {
        Ok(transcription) => {
            Json(json!({ "status": "success", "transcription": transcription })).into_response()
        }
        Err(AppError::Validation(message)) => error_response(StatusCode::BAD_REQUEST, &message),
        Err(err) => {
            tracing::error!("Transcription failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.user_message())
        }
    }
}
