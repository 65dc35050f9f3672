use serde::{Deserialize, Serialize};

/// A stored client record.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub balance: f64,
    pub workplace: Option<String>,
}

/// Body of a create or update request.
///
/// Every field is optional on the wire; the store decides what an absent
/// field means (NULL for text, 0 for the balance).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClientPayload {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub balance: Option<f64>,
    pub workplace: Option<String>,
}

impl From<&Client> for ClientPayload {
    fn from(client: &Client) -> Self {
        Self {
            name: Some(client.name.clone()),
            phone: Some(client.phone.clone()),
            balance: Some(client.balance),
            workplace: client.workplace.clone(),
        }
    }
}
