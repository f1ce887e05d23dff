//! Client Entity
//!
//! A client card on the pipeline board. The store owns the record; the
//! board holds a cached, locally patched copy between reloads.

use serde::{Deserialize, Serialize};

use super::error::{DomainError, DomainResult};
use super::stage::Stage;

/// A client on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned identifier, stable for the client's lifetime
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    /// Missing or unknown stage values deserialize as New
    #[serde(default)]
    pub stage: Stage,
    /// Ordering key within the stage. Dense real, no uniqueness required.
    pub position: f64,
    /// Store-assigned creation time, epoch milliseconds. Ordering tiebreak only.
    pub created_at: i64,
}

/// Fields for creating a client. The store assigns id, created_at and
/// the initial position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub stage: Stage,
}

impl NewClient {
    /// Store-side input validation, shared by all backends
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial update of a client. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

impl ClientPatch {
    /// Patch for an explicit advance/revert: stage only, position untouched
    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }

    /// Patch for a completed drag: stage and position together
    pub fn placement(stage: Stage, position: f64) -> Self {
        Self {
            stage: Some(stage),
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch for a renumbering pass: position only
    pub fn position(position: f64) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch carrying the full form content (create/edit dialog).
    /// Empty phone/notes overwrite so cleared fields stick.
    pub fn from_form(fields: &NewClient) -> Self {
        Self {
            name: Some(fields.name.clone()),
            phone: Some(fields.phone.clone().unwrap_or_default()),
            notes: Some(fields.notes.clone().unwrap_or_default()),
            stage: Some(fields.stage),
            position: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.notes.is_none()
            && self.stage.is_none()
            && self.position.is_none()
    }

    /// Store-side input validation, shared by all backends
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("name must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Apply this patch to a cached client record
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            client.phone = Some(phone.clone());
        }
        if let Some(notes) = &self.notes {
            client.notes = Some(notes.clone());
        }
        if let Some(stage) = self.stage {
            client.stage = stage;
        }
        if let Some(position) = self.position {
            client.position = position;
        }
    }
}
