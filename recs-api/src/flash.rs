use recs_errors::AppError;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

impl FlashKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "flash--success",
            Self::Info => "flash--info",
            Self::Error => "flash--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Queues a one-shot message for the next rendered page.
pub async fn push(session: &Session, kind: FlashKind, message: impl Into<String>) -> Result<(), AppError> {
    let mut flashes: Vec<Flash> = crate::session::get(session, FLASH_KEY).await?.unwrap_or_default();
    flashes.push(Flash {
        kind,
        message: message.into(),
    });
    crate::session::set(session, FLASH_KEY, flashes).await
}

pub async fn error(session: &Session, message: impl Into<String>) -> Result<(), AppError> {
    push(session, FlashKind::Error, message).await
}

pub async fn success(session: &Session, message: impl Into<String>) -> Result<(), AppError> {
    push(session, FlashKind::Success, message).await
}

/// Returns and clears the queued messages.
pub async fn take_all(session: &Session) -> Vec<Flash> {
    match crate::session::take::<Vec<Flash>>(session, FLASH_KEY).await {
        Ok(flashes) => flashes.unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}
