mod resend;

pub use resend::ResendClient;

use recs_errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Where outgoing mail goes. `Console` logs the message instead of sending it.
pub enum EmailSender {
    Console,
    Resend(ResendClient),
}

impl EmailSender {
    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        match self {
            Self::Console => {
                tracing::info!(
                    to = %email.to,
                    subject = %email.subject,
                    "Email delivery disabled, message body:\n{}",
                    email.html
                );
                Ok(())
            }
            Self::Resend(client) => client.send(email).await,
        }
    }

    pub fn delivers_for_real(&self) -> bool {
        matches!(self, Self::Resend(_))
    }
}

pub fn login_email(to: &str, link: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Your Recs login link".to_string(),
        html: format!(
            r#"<p>Hi!</p>
<p>Click the link below to sign in to Recs. The link is valid for 10 minutes and can be used once.</p>
<p><a href="{link}">Sign in to Recs</a></p>
<p>If you didn't request this email you can safely ignore it.</p>"#
        ),
    }
}

pub fn trip_ready_email(to: &str, traveler_name: &str, destination: &str, link: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Recommendations for {traveler_name}'s trip to {destination}"),
        html: format!(
            r#"<p>Thanks for recommending places for {traveler_name}'s trip to {destination}!</p>
<p>See everything that was shared: <a href="{link}">{link}</a></p>"#
        ),
    }
}
