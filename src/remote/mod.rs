use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::warn;

use crate::models::{Client, ClientPayload};

/// Why a request to the API did not succeed.
#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error("server responded with {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Failures surfaced to the user. The message is fixed per action; the
/// underlying cause is kept as the error source.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch clients")]
    Fetch(#[source] RequestFailure),

    #[error("Failed to save client")]
    Save(#[source] RequestFailure),

    #[error("Failed to delete client")]
    Delete(#[source] RequestFailure),
}

/// HTTP client for the `/api/clients` routes.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    clients_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            clients_url: format!("{}/api/clients", base_url.trim_end_matches('/')),
        }
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.fetch_all().await.map_err(|e| log(ApiError::Fetch(e)))
    }

    async fn fetch_all(&self) -> Result<Vec<Client>, RequestFailure> {
        let response = ok(self.http.get(&self.clients_url).send().await?)?;

        Ok(response.json::<Vec<Client>>().await?)
    }

    pub async fn create_client(&self, client: &ClientPayload) -> Result<(), ApiError> {
        let request = self.http.post(&self.clients_url).json(client);

        send(request).await.map_err(|e| log(ApiError::Save(e)))
    }

    pub async fn update_client(&self, id: i64, client: &ClientPayload) -> Result<(), ApiError> {
        let request = self.http.put(self.client_url(id)).json(client);

        send(request).await.map_err(|e| log(ApiError::Save(e)))
    }

    pub async fn delete_client(&self, id: i64) -> Result<(), ApiError> {
        let request = self.http.delete(self.client_url(id));

        send(request).await.map_err(|e| log(ApiError::Delete(e)))
    }

    fn client_url(&self, id: i64) -> String {
        format!("{}/{}", self.clients_url, id)
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<(), RequestFailure> {
    ok(request.send().await?)?;
    Ok(())
}

fn ok(response: Response) -> Result<Response, RequestFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(RequestFailure::Status(status));
    }
    Ok(response)
}

fn log(error: ApiError) -> ApiError {
    if let Some(cause) = std::error::Error::source(&error) {
        warn!(cause = %cause, "{error}");
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::spawn_test_server;

    fn payload(name: &str, phone: &str, balance: f64) -> ClientPayload {
        ClientPayload {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            balance: Some(balance),
            workplace: None,
        }
    }

    #[tokio::test]
    async fn round_trips_through_a_live_server() {
        let api = ApiClient::new(&spawn_test_server().await);

        api.create_client(&payload("Ann", "123", 4.0)).await.unwrap();
        let clients = api.list_clients().await.unwrap();
        assert_eq!(clients.len(), 1);

        let id = clients[0].id;
        api.update_client(id, &payload("Ann", "321", 5.0)).await.unwrap();
        let clients = api.list_clients().await.unwrap();
        assert_eq!(clients[0].phone, "321");
        assert_eq!(clients[0].balance, 5.0);

        api.delete_client(id).await.unwrap();
        assert!(api.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_ignored() {
        let base = spawn_test_server().await;
        let api = ApiClient::new(&format!("{base}/"));

        assert!(api.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_maps_to_action_message() {
        let api = ApiClient::new(&spawn_test_server().await);

        let err = api.delete_client(77).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to delete client");
        assert!(matches!(
            err,
            ApiError::Delete(RequestFailure::Status(StatusCode::NOT_FOUND))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        let api = ApiClient::new("http://127.0.0.1:9");

        let err = api.list_clients().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch clients");
        assert!(matches!(err, ApiError::Fetch(RequestFailure::Transport(_))));
    }
}
