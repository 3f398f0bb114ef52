//! medreg REST API server binary.
//!
//! # Environment Variables
//! - `MEDREG_REST_ADDR`: server address (default: "0.0.0.0:3000")
//! - `MEDREG_DB_PATH`: SQLite database file (default: "medreg.db")
//! - `RUST_LOG`: tracing filter directives

use std::sync::Arc;

use api_rest::{app, AppState};
use medreg_core::{ExamIntake, PatientRegistry, Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medreg_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDREG_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let db_path = std::env::var("MEDREG_DB_PATH").unwrap_or_else(|_| "medreg.db".into());

    tracing::info!("-- Starting medreg REST API on {}", addr);
    tracing::info!("-- Database at {}", db_path);

    let storage = Arc::new(Storage::open(&db_path)?);
    let registry = Arc::new(PatientRegistry::new(storage.clone()));
    let intake = Arc::new(ExamIntake::new(storage, registry.clone()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(AppState { registry, intake })).await?;

    Ok(())
}
