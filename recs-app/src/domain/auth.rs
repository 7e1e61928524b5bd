use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TOKEN_TTL_MINUTES: i64 = 10;
pub const TOKEN_LENGTH: usize = 43;

/// A freshly issued login link. `url` is what gets mailed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginLink {
    pub email: String,
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
