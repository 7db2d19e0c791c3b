//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `kernel::error::AppError` inside the entry crate.

use anyhow::{Context, anyhow, bail};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use entry::{EntryConfig, PgEntryRepository, entry_router};
use qr_token::QrSecret;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,entry=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let entry_config = load_entry_config()?;
    tracing::info!(
        window_ms = entry_config.window.window_ms(),
        past_slots = entry_config.freshness.max_past_slots,
        future_slots = entry_config.freshness.max_future_slots,
        "Entry tokens configured"
    );

    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let app = Router::new()
        .nest(
            "/api/entry",
            entry_router(PgEntryRepository::new(pool), entry_config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be host:port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Secrets from the environment; debug builds fall back to random ones
fn load_entry_config() -> anyhow::Result<EntryConfig> {
    let qr_secret = env::var("QR_SECRET").ok();
    let session_secret = env::var("AUTH_SESSION_SECRET").ok();

    let (qr_secret, session_secret) = match (qr_secret, session_secret) {
        (Some(qr), Some(session)) => (qr, session),
        _ if cfg!(debug_assertions) => {
            tracing::warn!("QR_SECRET or AUTH_SESSION_SECRET unset, using random development secrets");
            return Ok(EntryConfig::development());
        }
        _ => bail!("QR_SECRET and AUTH_SESSION_SECRET must be set in production"),
    };

    let qr_secret = QrSecret::from_text(&qr_secret).context("QR_SECRET is invalid")?;
    let session_bytes = general_purpose::STANDARD
        .decode(session_secret.trim())
        .context("AUTH_SESSION_SECRET must be base64")?;
    let session_secret: [u8; 32] = session_bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("AUTH_SESSION_SECRET must decode to 32 bytes"))?;

    Ok(EntryConfig::new(qr_secret, session_secret))
}
