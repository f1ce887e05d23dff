//! In-Memory Store
//!
//! HashMap-backed implementation of the store contract. Used as the
//! test double and as an offline backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{position, Client, ClientPatch, DomainError, DomainResult, NewClient};
use super::traits::ClientStore;

/// In-process client store
#[derive(Default)]
pub struct MemoryStore {
    clients: Mutex<HashMap<String, Client>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn list(&self) -> DomainResult<Vec<Client>> {
        let clients = self.clients.lock().await;
        let mut all: Vec<Client> = clients.values().cloned().collect();
        all.sort_by(|a, b| {
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(all)
    }

    async fn insert(&self, fields: &NewClient) -> DomainResult<Client> {
        fields.validate()?;
        let mut clients = self.clients.lock().await;

        let max = clients
            .values()
            .map(|c| c.position)
            .fold(None, |max: Option<f64>, p| {
                Some(max.map_or(p, |m| m.max(p)))
            });
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            notes: fields.notes.clone(),
            stage: fields.stage,
            position: max.map_or_else(position::first_in_stage, position::append_after),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        clients.insert(client.id.clone(), client.clone());
        Ok(client)
    }

    async fn update(&self, id: &str, patch: &ClientPatch) -> DomainResult<()> {
        patch.validate()?;
        let mut clients = self.clients.lock().await;
        match clients.get_mut(id) {
            Some(client) => {
                patch.apply_to(client);
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("client {}", id))),
        }
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut clients = self.clients.lock().await;
        clients.remove(id);
        Ok(())
    }
}
