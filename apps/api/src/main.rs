//! Dealdesk API composition root.

#![forbid(unsafe_code)]

mod dev_seed;
mod dto;
mod error;
mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use dealdesk_application::ScopeService;
use dealdesk_core::AppError;
use dealdesk_infrastructure::{
    InMemoryDirectory, PostgresEmployeeDirectory, PostgresPortalUserDirectory,
    PostgresRoleDirectory,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let directory_provider =
        env::var("DIRECTORY_PROVIDER").unwrap_or_else(|_| "postgres".to_owned());

    let scope_service = match directory_provider.as_str() {
        "postgres" => {
            let database_url = required_env("DATABASE_URL")?;
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            sqlx::migrate!("../../crates/infrastructure/migrations")
                .run(&pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to run migrations: {error}"))
                })?;

            ScopeService::new(
                Arc::new(PostgresPortalUserDirectory::new(pool.clone())),
                Arc::new(PostgresRoleDirectory::new(pool.clone())),
                Arc::new(PostgresEmployeeDirectory::new(pool)),
            )
        }
        "memory" => {
            let directory = Arc::new(InMemoryDirectory::new());
            dev_seed::seed_demo_directory(&directory).await?;
            ScopeService::new(directory.clone(), directory.clone(), directory)
        }
        _ => {
            return Err(AppError::Validation(format!(
                "DIRECTORY_PROVIDER must be either 'postgres' or 'memory', got '{directory_provider}'"
            )));
        }
    };

    let app_state = AppState { scope_service };

    let app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/scope", get(handlers::resolve_scope_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "dealdesk-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
