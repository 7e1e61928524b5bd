use super::OutgoingEmail;
use recs_errors::AppError;
use serde::Serialize;
use std::time::Duration;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

pub struct ResendClient {
    http_client: reqwest::Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendClient {
    pub fn new(api_key: String, from: String) -> Self {
        Self::with_endpoint(api_key, from, RESEND_API_URL.to_string())
    }

    pub fn with_endpoint(api_key: String, from: String, endpoint: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            api_key,
            from,
            endpoint,
        }
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let request = SendEmailRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::EmailDelivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Resend error: {} - {}", status, body);
            return Err(AppError::EmailDelivery(format!("API error: {}", status)));
        }

        tracing::info!("Sent '{}' to {}", email.subject, email.to);
        Ok(())
    }
}
