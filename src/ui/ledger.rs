use std::sync::Arc;

use crate::models::Client;

/// The front end's copy of the last fetched client list.
///
/// A snapshot is never patched: each successful fetch builds a new one and
/// the old one is dropped.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    clients: Arc<[Client]>,
}

impl ClientSnapshot {
    pub fn new(clients: Vec<Client>) -> Self {
        Self {
            clients: clients.into(),
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn find(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Clients whose name, phone or workplace contains `query`, ignoring case.
    /// Order is preserved.
    pub fn filter(&self, query: &str) -> Vec<Client> {
        let needle = query.to_lowercase();

        self.clients
            .iter()
            .filter(|c| matches(c, &needle))
            .cloned()
            .collect()
    }
}

fn matches(client: &Client, needle: &str) -> bool {
    client.name.to_lowercase().contains(needle)
        || client.phone.to_lowercase().contains(needle)
        || client
            .workplace
            .as_deref()
            .is_some_and(|w| w.to_lowercase().contains(needle))
}
