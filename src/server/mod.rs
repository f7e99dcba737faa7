//! JSON HTTP API over the planner
//!
//! Meals, week plans and shopping lists under a small REST surface, with
//! permissive CORS for a browser front end and graceful shutdown on Ctrl+C
//! or SIGTERM.

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::errors::Result;
use crate::planner::Planner;

pub mod error;
pub mod routes;

pub use error::ApiError;

use routes::{
    assign_meal_handler, copy_week_handler, create_meal_handler, delete_meal_handler,
    get_meal_handler, get_week_handler, health_handler, list_meals_handler, remove_meal_handler,
    shopping_handler, update_meal_handler,
};

/// Build the API router
pub fn router(planner: Planner) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/meals", get(list_meals_handler).post(create_meal_handler))
        .route(
            "/meals/{id}",
            get(get_meal_handler)
                .put(update_meal_handler)
                .delete(delete_meal_handler),
        )
        .route("/weeks/{date}", get(get_week_handler))
        .route(
            "/weeks/{date}/days/{day}/{slot}",
            put(assign_meal_handler).delete(remove_meal_handler),
        )
        .route("/weeks/{date}/copy", post(copy_week_handler))
        .route("/weeks/{date}/shopping", get(shopping_handler))
        .layer(cors)
        .with_state(Arc::new(planner))
}

/// Bind `address` and serve until a shutdown signal arrives
pub async fn serve(address: &str, planner: Planner) -> Result<()> {
    let store = planner.store_name().to_string();
    let app = router(planner);

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!(%store, "Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
