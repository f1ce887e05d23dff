//! Board Session
//!
//! The owned session state: cached collection, store handle, active
//! filter, the at-most-one dragged-card reference, and pending user
//! notices. UI collaborators dispatch commands here. Structural
//! mutations (move, advance/revert, delete) apply locally first and
//! reconcile by full reload when the store call fails; form
//! submissions wait for the store round trip before reloading.

use std::sync::Arc;

use crate::domain::{position, Client, ClientPatch, DomainError, DomainResult, NewClient, Stage};
use crate::store::ClientStore;

use super::collection::ClientCollection;

/// Generic user-facing message for a failed mutation
pub const SYNC_FAILURE_NOTICE: &str = "Could not save your change. The board was reloaded.";
/// User-facing message for a failed load
pub const LOAD_FAILURE_NOTICE: &str = "Could not load the board.";

/// A command dispatched by the UI layer
#[derive(Debug, Clone)]
pub enum Command {
    /// A drag completed over a target stage. `before` is the card the
    /// dragged one lands in front of; None appends at the end.
    Move {
        id: String,
        target_stage: Stage,
        before: Option<String>,
    },
    /// Explicit forward step along the stage flow
    Advance { id: String },
    /// Explicit backward step along the stage flow
    Revert { id: String },
    Delete { id: String },
    /// Create (id None) or edit (id Some) through the form; pessimistic
    Submit {
        id: Option<String>,
        fields: NewClient,
    },
    SetFilter { term: String },
}

/// Outcome of resolving a drop position against the visible rows
enum Placement {
    At(f64),
    /// Neighbors too close together; the stage needs renumbering first
    GapExhausted,
    /// The anchor card is no longer on the board
    StaleAnchor,
}

/// One board session against one store. Constructed at session start,
/// dropped at session end; all mutation goes through `&mut self`, so
/// commands are serialized and no command can observe another's
/// half-applied state.
pub struct BoardSession {
    store: Arc<dyn ClientStore>,
    clients: ClientCollection,
    filter: Option<String>,
    dragging: Option<String>,
    notices: Vec<String>,
}

impl BoardSession {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self {
            store,
            clients: ClientCollection::new(),
            filter: None,
            dragging: None,
            notices: Vec::new(),
        }
    }

    /// Replace the cached collection with store truth
    pub async fn load(&mut self) -> DomainResult<()> {
        match self.store.list().await {
            Ok(all) => {
                log::info!("loaded {} clients", all.len());
                self.clients.replace_all(all);
                Ok(())
            }
            Err(err) => {
                log::error!("load failed: {}", err);
                self.notices.push(LOAD_FAILURE_NOTICE.to_string());
                Err(err)
            }
        }
    }

    /// Dispatch a command. Store failures are absorbed: the session
    /// logs, pushes a notice and reloads; Err comes back only when
    /// that reload itself failed.
    pub async fn dispatch(&mut self, command: Command) -> DomainResult<()> {
        match command {
            Command::Move {
                id,
                target_stage,
                before,
            } => self.move_client(&id, target_stage, before.as_deref()).await,
            Command::Advance { id } => self.shift_stage(&id, true).await,
            Command::Revert { id } => self.shift_stage(&id, false).await,
            Command::Delete { id } => self.delete_client(&id).await,
            Command::Submit { id, fields } => self.submit(id.as_deref(), fields).await,
            Command::SetFilter { term } => {
                self.set_filter(term);
                Ok(())
            }
        }
    }

    /// All clients passing the active filter, in collection order
    pub fn current_view(&self) -> Vec<&Client> {
        match &self.filter {
            Some(term) => self.clients.filtered(term),
            None => self.clients.iter().collect(),
        }
    }

    /// One stage's column of the current view
    pub fn stage_view(&self, stage: Stage) -> Vec<&Client> {
        self.current_view()
            .into_iter()
            .filter(|c| c.stage == stage)
            .collect()
    }

    pub fn clients(&self) -> &ClientCollection {
        &self.clients
    }

    /// Record the card a drag session started on
    pub fn set_dragging(&mut self, id: impl Into<String>) {
        self.dragging = Some(id.into());
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Clear the drag reference without completing the drag
    pub fn take_dragging(&mut self) -> Option<String> {
        self.dragging.take()
    }

    /// Drain the queued user-facing notices
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    async fn move_client(
        &mut self,
        id: &str,
        target_stage: Stage,
        before: Option<&str>,
    ) -> DomainResult<()> {
        self.dragging = None;
        if self.clients.get(id).is_none() {
            let err = DomainError::NotFound(format!("client {}", id));
            return self.reconcile("move", err).await;
        }

        let rows = self.visible_rows(target_stage, Some(id));
        let new_position = match placement(&rows, before) {
            Placement::At(key) => key,
            Placement::StaleAnchor => {
                let err = DomainError::NotFound("insertion anchor left the board".to_string());
                return self.reconcile("move", err).await;
            }
            Placement::GapExhausted => {
                if let Err(err) = self.resequence_stage(target_stage, id).await {
                    return self.reconcile("move", err).await;
                }
                let rows = self.visible_rows(target_stage, Some(id));
                match placement(&rows, before) {
                    Placement::At(key) => key,
                    // Renumbering restored step-sized gaps, so only a
                    // vanished anchor lands here
                    _ => {
                        let err =
                            DomainError::NotFound("insertion anchor left the board".to_string());
                        return self.reconcile("move", err).await;
                    }
                }
            }
        };

        if let Some(client) = self.clients.get_mut(id) {
            client.stage = target_stage;
            client.position = new_position;
        }
        self.clients.resort();

        let patch = ClientPatch::placement(target_stage, new_position);
        match self.store.update(id, &patch).await {
            Ok(()) => Ok(()),
            Err(err) => self.reconcile("move", err).await,
        }
    }

    async fn shift_stage(&mut self, id: &str, forward: bool) -> DomainResult<()> {
        let current = match self.clients.get(id) {
            Some(client) => client.stage,
            None => {
                let err = DomainError::NotFound(format!("client {}", id));
                return self.reconcile("stage shift", err).await;
            }
        };
        let next = if forward {
            current.advance()
        } else {
            current.revert()
        };
        // Chain edge, or Lost outside the flow: nothing to do
        if next == current {
            return Ok(());
        }

        if let Some(client) = self.clients.get_mut(id) {
            client.stage = next;
        }
        self.clients.resort();

        match self.store.update(id, &ClientPatch::stage(next)).await {
            Ok(()) => Ok(()),
            Err(err) => self.reconcile("stage shift", err).await,
        }
    }

    async fn delete_client(&mut self, id: &str) -> DomainResult<()> {
        if self.clients.remove(id).is_none() {
            let err = DomainError::NotFound(format!("client {}", id));
            return self.reconcile("delete", err).await;
        }
        match self.store.delete(id).await {
            Ok(()) => Ok(()),
            Err(err) => self.reconcile("delete", err).await,
        }
    }

    /// Form path. Nothing is applied locally until the store confirms;
    /// the reload afterwards picks up server-assigned fields (id,
    /// created_at, initial position).
    async fn submit(&mut self, id: Option<&str>, fields: NewClient) -> DomainResult<()> {
        let saved = match id {
            Some(id) => {
                self.store
                    .update(id, &ClientPatch::from_form(&fields))
                    .await
            }
            None => self.store.insert(&fields).await.map(|_| ()),
        };
        match saved {
            Ok(()) => self.load().await,
            Err(err) => self.reconcile("save", err).await,
        }
    }

    fn set_filter(&mut self, term: String) {
        let term = term.trim().to_string();
        self.filter = if term.is_empty() { None } else { Some(term) };
    }

    /// Visible rows of a stage as (id, position), dragged card excluded
    fn visible_rows(&self, stage: Stage, exclude: Option<&str>) -> Vec<(String, f64)> {
        self.stage_view(stage)
            .into_iter()
            .filter(|c| exclude.map_or(true, |x| c.id != x))
            .map(|c| (c.id.clone(), c.position))
            .collect()
    }

    /// Renumber every card of a stage (except the one being placed) to
    /// evenly spaced keys, locally and remotely
    async fn resequence_stage(&mut self, stage: Stage, skip: &str) -> DomainResult<()> {
        let ids: Vec<String> = self
            .clients
            .in_stage(stage)
            .iter()
            .filter(|c| c.id != skip)
            .map(|c| c.id.clone())
            .collect();
        let assigned: Vec<(String, f64)> = ids
            .iter()
            .cloned()
            .zip(position::resequenced(ids.len()))
            .collect();

        for (id, key) in &assigned {
            if let Some(client) = self.clients.get_mut(id) {
                client.position = *key;
            }
        }
        self.clients.resort();

        for (id, key) in &assigned {
            self.store.update(id, &ClientPatch::position(*key)).await?;
        }
        log::info!(
            "resequenced {} cards in stage {}",
            assigned.len(),
            stage.as_str()
        );
        Ok(())
    }

    /// Failure path shared by every mutating operation: log, queue a
    /// generic notice, throw the optimistic state away and reload.
    async fn reconcile(&mut self, context: &str, err: DomainError) -> DomainResult<()> {
        log::error!("{} failed: {}; reloading from store", context, err);
        self.notices.push(SYNC_FAILURE_NOTICE.to_string());
        self.load().await
    }
}

/// Resolve the position key for a drop against the visible rows of the
/// target stage
fn placement(rows: &[(String, f64)], before: Option<&str>) -> Placement {
    if rows.is_empty() {
        return Placement::At(position::first_in_stage());
    }
    let Some(anchor) = before else {
        let (_, last) = &rows[rows.len() - 1];
        return Placement::At(position::append_after(*last));
    };
    let Some(index) = rows.iter().position(|(id, _)| id.as_str() == anchor) else {
        return Placement::StaleAnchor;
    };
    let next = rows[index].1;
    if index == 0 {
        return Placement::At(position::at_head(next));
    }
    let prev = rows[index - 1].1;
    if position::gap_exhausted(prev, next) {
        return Placement::GapExhausted;
    }
    Placement::At(position::between(prev, next))
}
