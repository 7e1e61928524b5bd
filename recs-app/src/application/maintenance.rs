use super::db_error;
use crate::infrastructure::db::{
    reset_schema, run_migrations, DestinationRepository, NewDestination, SubscriptionRepository,
    TripRepository, UserRepository,
};
use crate::infrastructure::email::{trip_ready_email, EmailSender};
use recs_errors::AppError;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

const SEED_ADMIN_EMAIL: &str = "admin@example.com";
const SEED_ADMIN_NAME: &str = "Admin User";

/// (name, display name, country, type, latitude, longitude)
const SEED_DESTINATIONS: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("Tokyo", "Tokyo, Japan", "Japan", "city", 35.6762, 139.6503),
    ("Kyoto", "Kyoto, Japan", "Japan", "city", 35.0116, 135.7681),
    ("Paris", "Paris, France", "France", "city", 48.8566, 2.3522),
    ("Rome", "Rome, Italy", "Italy", "city", 41.9028, 12.4964),
    ("Athens", "Athens, Greece", "Greece", "city", 37.9838, 23.7275),
    ("Lisbon", "Lisbon, Portugal", "Portugal", "city", 38.7223, -9.1393),
    ("Barcelona", "Barcelona, Spain", "Spain", "city", 41.3874, 2.1686),
    ("New York", "New York, United States", "United States", "city", 40.7128, -74.0060),
    ("Mexico City", "Mexico City, Mexico", "Mexico", "city", 19.4326, -99.1332),
    ("Bali", "Bali, Indonesia", "Indonesia", "region", -8.3405, 115.0920),
    ("Iceland", "Iceland", "Iceland", "country", 64.9631, -19.0208),
    ("Cape Town", "Cape Town, South Africa", "South Africa", "city", -33.9249, 18.4241),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub sent: usize,
    pub failed: usize,
}

/// Operator tasks behind the CLI.
pub struct Maintenance {
    db: DatabaseConnection,
    users: UserRepository,
    trips: TripRepository,
    destinations: DestinationRepository,
    subscriptions: SubscriptionRepository,
    mailer: Arc<EmailSender>,
    base_url: String,
}

impl Maintenance {
    pub fn new(
        db: DatabaseConnection,
        mailer: Arc<EmailSender>,
        base_url: String,
    ) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            trips: TripRepository::new(db.clone()),
            destinations: DestinationRepository::new(db.clone()),
            subscriptions: SubscriptionRepository::new(db.clone()),
            db,
            mailer,
            base_url,
        }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        run_migrations(&self.db).await.map_err(db_error)
    }

    /// Drops every table and recreates the schema empty.
    pub async fn reset_database(&self) -> Result<(), AppError> {
        reset_schema(&self.db).await.map_err(db_error)?;
        tracing::info!("Database reset");
        Ok(())
    }

    /// Adds the admin user and the starter destinations. Safe to run repeatedly; returns
    /// how many destinations were inserted.
    pub async fn seed(&self) -> Result<usize, AppError> {
        let (admin, _) = self
            .users
            .get_or_create(SEED_ADMIN_EMAIL)
            .await
            .map_err(db_error)?;
        if admin.name.is_none() {
            self.users
                .update_name(admin, SEED_ADMIN_NAME)
                .await
                .map_err(db_error)?;
        }

        let mut inserted = 0;
        for (name, display_name, country, kind, latitude, longitude) in SEED_DESTINATIONS {
            if self
                .destinations
                .find_by_name(name)
                .await
                .map_err(db_error)?
                .is_some()
            {
                continue;
            }
            self.destinations
                .create(NewDestination {
                    name: name.to_string(),
                    display_name: Some(display_name.to_string()),
                    country: Some(country.to_string()),
                    kind: Some(kind.to_string()),
                    latitude: Some(*latitude),
                    longitude: Some(*longitude),
                    google_place_id: None,
                })
                .await
                .map_err(db_error)?;
            inserted += 1;
        }

        tracing::info!("Seeded {} destinations", inserted);
        Ok(inserted)
    }

    /// Emails every subscriber not yet notified and marks each successful delivery.
    pub async fn notify_subscribers(&self, slug: &str) -> Result<NotifyReport, AppError> {
        let trip = self
            .trips
            .find_by_slug(slug)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::not_found("Trip"))?;

        let link = format!("{}/trip/{}", self.base_url, trip.slug);
        let mut report = NotifyReport::default();

        for subscriber in self
            .subscriptions
            .pending_subscribers(trip.id)
            .await
            .map_err(db_error)?
        {
            let email = trip_ready_email(&subscriber.email, &trip.traveler_name, &trip.destination, &link);
            match self.mailer.send(&email).await {
                Ok(()) => {
                    self.subscriptions
                        .mark_notified(subscriber.id, trip.id)
                        .await
                        .map_err(db_error)?;
                    report.sent += 1;
                }
                Err(err) => {
                    tracing::error!(email = %subscriber.email, "Failed to notify subscriber: {}", err);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(slug = %trip.slug, sent = report.sent, failed = report.failed, "Notified subscribers");
        Ok(report)
    }
}
