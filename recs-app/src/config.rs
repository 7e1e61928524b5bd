use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://recs.db?mode=rwc";
const DEFAULT_SITE_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAIL_FROM: &str = "Recs <noreply@recs.local>";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub site_addr: String,
    pub base_url: String,
    /// Debug mode shows login links in the page and enables the admin dashboard.
    pub debug: bool,
    pub force_real_emails: bool,
    pub openai_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub resend_api_key: Option<String>,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let site_addr = var("SITE_ADDR").unwrap_or_else(|| DEFAULT_SITE_ADDR.to_string());
        let base_url = var("BASE_URL")
            .unwrap_or_else(|| format!("http://{site_addr}"))
            .trim_end_matches('/')
            .to_string();
        let debug = !var("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production"));
        let force_real_emails = var("FORCE_REAL_EMAILS")
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"));

        Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            site_addr,
            base_url,
            debug,
            force_real_emails,
            openai_api_key: var("OPENAI_API_KEY"),
            google_maps_api_key: var("GOOGLE_MAPS_API_KEY"),
            resend_api_key: var("RESEND_API_KEY"),
            mail_from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
        }
    }

    /// Configuration for tests: debug mode, no external services.
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "BASE_URL" => Some("http://recs.test".to_string()),
            _ => None,
        })
    }

    /// Login links are rendered into the page instead of only being emailed.
    pub fn show_login_links(&self) -> bool {
        self.debug && !self.force_real_emails
    }

    /// Real delivery happens outside debug mode, or when forced, and only with a key.
    pub fn sends_real_emails(&self) -> bool {
        (!self.debug || self.force_real_emails) && self.resend_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, "sqlite://recs.db?mode=rwc");
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert!(config.debug);
        assert!(config.show_login_links());
        assert!(!config.sends_real_emails());
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn production_disables_debug() {
        let config = config_from(&[("APP_ENV", "production"), ("RESEND_API_KEY", "re_123")]);
        assert!(!config.debug);
        assert!(!config.show_login_links());
        assert!(config.sends_real_emails());
    }

    #[test]
    fn forced_emails_hide_links_in_debug() {
        let config = config_from(&[("FORCE_REAL_EMAILS", "true"), ("RESEND_API_KEY", "re_123")]);
        assert!(config.debug);
        assert!(!config.show_login_links());
        assert!(config.sends_real_emails());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = config_from(&[("BASE_URL", "https://recs.example/"), ("OPENAI_API_KEY", " ")]);
        assert_eq!(config.base_url, "https://recs.example");
        assert!(config.openai_api_key.is_none());
    }
}
