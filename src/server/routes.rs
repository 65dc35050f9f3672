use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AppState, error::AppError};
use crate::models::{Client, ClientPayload};

/// Acknowledgement body returned by every mutating route.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

pub async fn list_clients_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = state.db.list_clients().await?;

    Ok(Json(clients))
}

pub async fn create_client_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClientPayload>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let id = state.db.create_client(&payload).await?;
    info!(id, "client added");

    Ok((StatusCode::CREATED, Message::new("Client added")))
}

pub async fn update_client_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<Message>, AppError> {
    if !state.db.update_client(id, &payload).await? {
        return Err(AppError::NotFound);
    }
    info!(id, "client updated");

    Ok(Message::new("Client updated"))
}

pub async fn delete_client_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    if !state.db.delete_client(id).await? {
        return Err(AppError::NotFound);
    }
    info!(id, "client deleted");

    Ok(Message::new("Client deleted"))
}
