use crate::application::{
    CreateTrip, ExtractRecommendations, Maintenance, ManageTrips, PasswordlessAuth,
    ResolveActivity, SaveRecommendations, SearchDestinations,
};
use crate::config::AppConfig;
use crate::infrastructure::db::{
    ActivityRepository, AuthTokenRepository, DestinationRepository, RecommendationRepository,
    SubscriptionRepository, TripRepository, UserRepository,
};
use crate::infrastructure::email::{EmailSender, ResendClient};
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::places::{GooglePlacesClient, NominatimClient};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Outbound service clients. Missing API keys leave the matching client unset.
pub struct Clients {
    pub openai: Option<Arc<OpenAiClient>>,
    pub google_places: Option<Arc<GooglePlacesClient>>,
    pub nominatim: Arc<NominatimClient>,
    pub mailer: Arc<EmailSender>,
}

impl Clients {
    pub fn from_config(config: &AppConfig) -> Self {
        let openai = config.openai_api_key.clone().map(|key| {
            tracing::info!("Using OpenAI for extraction and transcription");
            Arc::new(OpenAiClient::new(key))
        });
        if openai.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, AI features are degraded");
        }

        let google_places = config
            .google_maps_api_key
            .clone()
            .map(|key| Arc::new(GooglePlacesClient::new(key)));

        let mailer = match (&config.resend_api_key, config.sends_real_emails()) {
            (Some(key), true) => {
                tracing::info!("Sending email through Resend");
                EmailSender::Resend(ResendClient::new(key.clone(), config.mail_from.clone()))
            }
            _ => {
                tracing::info!("Email delivery disabled, login links are logged");
                EmailSender::Console
            }
        };

        Self {
            openai,
            google_places,
            nominatim: Arc::new(NominatimClient::new()),
            mailer: Arc::new(mailer),
        }
    }

    /// No external services at all.
    pub fn offline() -> Self {
        Self {
            openai: None,
            google_places: None,
            nominatim: Arc::new(NominatimClient::new()),
            mailer: Arc::new(EmailSender::Console),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub auth: Arc<PasswordlessAuth>,
    pub create_trip: Arc<CreateTrip>,
    pub manage_trips: Arc<ManageTrips>,
    pub extract_recommendations: Arc<ExtractRecommendations>,
    pub resolve_activity: Arc<ResolveActivity>,
    pub save_recommendations: Arc<SaveRecommendations>,
    pub search_destinations: Arc<SearchDestinations>,
    pub maintenance: Arc<Maintenance>,
}

impl AppContext {
    pub fn new(config: AppConfig, db: DatabaseConnection, clients: Clients) -> Self {
        let users = UserRepository::new(db.clone());
        let trips = TripRepository::new(db.clone());
        let activities = ActivityRepository::new(db.clone());
        let recommendations = RecommendationRepository::new(db.clone());
        let destinations = DestinationRepository::new(db.clone());

        let auth = Arc::new(PasswordlessAuth::new(
            users.clone(),
            AuthTokenRepository::new(db.clone()),
            clients.mailer.clone(),
            config.base_url.clone(),
        ));
        let resolve_activity = Arc::new(ResolveActivity::new(
            activities.clone(),
            clients.google_places.clone(),
        ));

        Self {
            create_trip: Arc::new(CreateTrip::new(
                users.clone(),
                trips.clone(),
                destinations.clone(),
                clients.openai.clone(),
                auth.clone(),
            )),
            manage_trips: Arc::new(ManageTrips::new(
                users.clone(),
                trips,
                activities,
                recommendations.clone(),
            )),
            extract_recommendations: Arc::new(ExtractRecommendations::new(clients.openai)),
            save_recommendations: Arc::new(SaveRecommendations::new(
                users,
                recommendations,
                SubscriptionRepository::new(db.clone()),
                resolve_activity.clone(),
            )),
            search_destinations: Arc::new(SearchDestinations::new(
                destinations,
                clients.google_places,
                clients.nominatim,
            )),
            maintenance: Arc::new(Maintenance::new(
                db.clone(),
                clients.mailer,
                config.base_url.clone(),
            )),
            resolve_activity,
            auth,
            config: Arc::new(config),
            db,
        }
    }

    pub fn from_config(config: AppConfig, db: DatabaseConnection) -> Self {
        let clients = Clients::from_config(&config);
        Self::new(config, db, clients)
    }
}
