use recs_errors::AppError;
use regex_lite::Regex;
use std::sync::LazyLock;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 100;
const MAX_DESTINATION_LENGTH: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

pub struct InputSanitizer;

impl InputSanitizer {
    /// Trims, lowercases and checks the shape of an email address.
    pub fn validate_email(email: &str) -> Result<String, AppError> {
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::validation("Please enter your email address."));
        }

        if email.len() > MAX_EMAIL_LENGTH || !EMAIL_PATTERN.is_match(&email) {
            return Err(AppError::validation("Please enter a valid email address."));
        }

        Ok(email)
    }

    pub fn validate_name(name: &str) -> Result<String, AppError> {
        let name = Self::require_non_blank(name, "Please enter your name.")?;
        Ok(name.chars().take(MAX_NAME_LENGTH).collect())
    }

    pub fn validate_destination(destination: &str) -> Result<String, AppError> {
        let destination = Self::require_non_blank(destination, "Please enter a destination.")?;
        Ok(destination.chars().take(MAX_DESTINATION_LENGTH).collect())
    }

    pub fn require_non_blank(value: &str, message: &str) -> Result<String, AppError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::validation(message));
        }
        Ok(value.to_string())
    }

    /// Prepares user text for interpolation into an AI prompt.
    pub fn sanitize_for_prompt(input: &str, max_len: usize) -> String {
        input
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .take(max_len)
            .collect::<String>()
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert_eq!(
            InputSanitizer::validate_email("  Ana@Example.COM ").unwrap(),
            "ana@example.com"
        );
        assert!(InputSanitizer::validate_email("first.last+tag@mail.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(InputSanitizer::validate_email("").is_err());
        assert!(InputSanitizer::validate_email("not-an-email").is_err());
        assert!(InputSanitizer::validate_email("a@b").is_err());
        assert!(InputSanitizer::validate_email("two words@example.com").is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(InputSanitizer::validate_name("   ").is_err());
        assert_eq!(InputSanitizer::validate_name(" Ana ").unwrap(), "Ana");
    }

    #[test]
    fn test_prompt_sanitizing() {
        let sanitized = InputSanitizer::sanitize_for_prompt("<b>hi</b>\u{0007}\nthere", 100);
        assert_eq!(sanitized, "&lt;b&gt;hi&lt;/b&gt;\nthere");

        let long = "a".repeat(50);
        assert_eq!(InputSanitizer::sanitize_for_prompt(&long, 10).len(), 10);
    }
}
