//! REST Store
//!
//! reqwest-backed implementation of the store contract against a
//! PostgREST-style HTTP API (the hosted backend the board was written
//! for). Rows live in a `clients` table exposed at `<url>/clients`;
//! filters use the `column=eq.value` query syntax and mutations ask
//! for `return=representation` so affected rows come back as JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{position, Client, ClientPatch, DomainError, DomainResult, NewClient};
use super::traits::ClientStore;

const URL_ENV: &str = "LEADBOARD_STORE_URL";
const TOKEN_ENV: &str = "LEADBOARD_STORE_TOKEN";

/// Remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL of the REST API, e.g. `https://host/rest/v1`
    pub url: String,
    /// API token, sent as both `apikey` and bearer auth
    pub token: String,
}

impl RestConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }

    /// Read the configuration from `LEADBOARD_STORE_URL` and
    /// `LEADBOARD_STORE_TOKEN`
    pub fn from_env() -> DomainResult<Self> {
        let url = std::env::var(URL_ENV)
            .map_err(|_| DomainError::Validation(format!("{} is not set", URL_ENV)))?;
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| DomainError::Validation(format!("{} is not set", TOKEN_ENV)))?;
        Ok(Self { url, token })
    }
}

/// HTTP implementation of the client store
pub struct RestStore {
    http: reqwest::Client,
    config: RestConfig,
}

impl RestStore {
    pub fn new(config: RestConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/clients", self.config.url.trim_end_matches('/'))
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.config.token)
            .bearer_auth(&self.config.token)
    }
}

/// Map a non-success response to a domain error
async fn check(resp: reqwest::Response) -> DomainResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        400 | 422 => DomainError::Validation(body),
        404 => DomainError::NotFound(body),
        _ => DomainError::Store(format!("{}: {}", status, body)),
    })
}

fn transport(err: reqwest::Error) -> DomainError {
    DomainError::Store(err.to_string())
}

#[async_trait]
impl ClientStore for RestStore {
    async fn list(&self) -> DomainResult<Vec<Client>> {
        let resp = self
            .authed(self.http.get(self.endpoint()))
            .query(&[("select", "*"), ("order", "position.asc,created_at.desc")])
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(transport)
    }

    async fn insert(&self, fields: &NewClient) -> DomainResult<Client> {
        fields.validate()?;

        // The table has no position default, so the initial key is
        // computed from the current board-wide maximum first.
        #[derive(Deserialize)]
        struct PositionRow {
            position: f64,
        }
        let resp = self
            .authed(self.http.get(self.endpoint()))
            .query(&[
                ("select", "position"),
                ("order", "position.desc"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(transport)?;
        let top: Vec<PositionRow> = check(resp).await?.json().await.map_err(transport)?;
        let next_position = top
            .first()
            .map_or_else(position::first_in_stage, |row| {
                position::append_after(row.position)
            });

        let body = serde_json::json!({
            "name": fields.name,
            "phone": fields.phone,
            "notes": fields.notes,
            "stage": fields.stage,
            "position": next_position,
        });
        let resp = self
            .authed(self.http.post(self.endpoint()))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let mut created: Vec<Client> = check(resp).await?.json().await.map_err(transport)?;
        created
            .pop()
            .ok_or_else(|| DomainError::Store("insert returned no row".to_string()))
    }

    async fn update(&self, id: &str, patch: &ClientPatch) -> DomainResult<()> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(());
        }
        let resp = self
            .authed(self.http.patch(self.endpoint()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(transport)?;
        let updated: Vec<Client> = check(resp).await?.json().await.map_err(transport)?;
        if updated.is_empty() {
            return Err(DomainError::NotFound(format!("client {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let resp = self
            .authed(self.http.delete(self.endpoint()))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }
}
