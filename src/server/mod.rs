use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, put},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::db::{self, Database};

pub mod error;
pub mod routes;

use routes::{
    create_client_handler, delete_client_handler, list_clients_handler, update_client_handler,
};

pub struct AppState {
    pub db: Database,
}

/// Build the API router over an initialized database.
pub fn router(db: Database) -> Router {
    let state = Arc::new(AppState { db });

    Router::new()
        .route(
            "/api/clients",
            get(list_clients_handler).post(create_client_handler),
        )
        .route(
            "/api/clients/:id",
            put(update_client_handler).delete(delete_client_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: &Config) -> Result<()> {
    info!("Initializing database...");
    let db = db::init(config).await?;

    let app = router(db);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install terminate handler");
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

/// Serve the API for an in-memory database on an ephemeral loopback port.
/// Returns the base URL.
#[cfg(test)]
pub async fn spawn_test_server() -> String {
    let db = Database::in_memory().await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(db)).await.unwrap();
    });

    format!("http://{address}")
}
