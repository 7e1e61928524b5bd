use clap::{Parser, Subcommand};
use recs_app::infrastructure::db;
use recs_app::{AppConfig, AppContext};
use recs_api::build_router;

#[derive(Parser)]
#[command(name = "recs", version, about = "Collect and share travel recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Drop all tables and recreate an empty schema
    InitDb,
    /// Insert the admin user and starter destinations
    SeedDb,
    /// Delete login tokens whose expiry has passed
    CleanupTokens,
    /// Email subscribers of a trip that have not been notified yet
    NotifySubscribers {
        /// Slug of the trip
        slug: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let connection = db::create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&connection)
        .await
        .expect("Failed to run database migrations");

    let app_context = AppContext::from_config(config, connection);

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(app_context).await;
            Ok(())
        }
        Command::InitDb => app_context
            .maintenance
            .reset_database()
            .await
            .map(|_| println!("Initialized the database.")),
        Command::SeedDb => app_context
            .maintenance
            .seed()
            .await
            .map(|count| println!("Seeded {} destinations.", count)),
        Command::CleanupTokens => app_context
            .auth
            .cleanup_expired_tokens()
            .await
            .map(|count| println!("Removed {} expired tokens.", count)),
        Command::NotifySubscribers { slug } => app_context
            .maintenance
            .notify_subscribers(&slug)
            .await
            .map(|report| {
                println!(
                    "Notified {} subscribers ({} failed).",
                    report.sent, report.failed
                )
            }),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn serve(app_context: AppContext) {
    let addr = app_context.config.site_addr.clone();
    let app = build_router(app_context.clone());

    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Login links: {}. Rate limit 3/min, 10/hour per email.",
        if app_context.config.show_login_links() {
            "shown in page"
        } else {
            "emailed"
        }
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    match app_context.auth.cleanup_expired_tokens().await {
        Ok(count) => tracing::info!("Shutdown: removed {} expired tokens", count),
        Err(e) => tracing::warn!("Shutdown token cleanup failed: {}", e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
