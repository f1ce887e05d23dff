//! Ordered Client Collection
//!
//! The session's cached copy of the store, kept sorted by
//! (stage, position ascending, created_at descending). Filtering
//! produces derived views and never mutates the source order.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::{Client, Stage};

/// Sorted, locally mutable cache of all clients
#[derive(Debug, Default)]
pub struct ClientCollection {
    clients: Vec<Client>,
}

impl ClientCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire contents with store truth
    pub fn replace_all(&mut self, clients: Vec<Client>) {
        self.clients = clients;
        self.resort();
    }

    /// Restore the sort order after patching stage or position
    pub fn resort(&mut self) {
        self.clients.sort_by(compare);
    }

    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Client> {
        let index = self.clients.iter().position(|c| c.id == id)?;
        Some(self.clients.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Clients of one stage, in collection order
    pub fn in_stage(&self, stage: Stage) -> Vec<&Client> {
        self.clients.iter().filter(|c| c.stage == stage).collect()
    }

    /// Derived view matching a search term across name, phone and
    /// notes. Case- and diacritic-insensitive substring match; source
    /// order is preserved.
    pub fn filtered(&self, term: &str) -> Vec<&Client> {
        let needle = fold_for_search(term.trim());
        if needle.is_empty() {
            return self.clients.iter().collect();
        }
        self.clients
            .iter()
            .filter(|c| {
                fold_for_search(&c.name).contains(&needle)
                    || c.phone
                        .as_deref()
                        .is_some_and(|p| fold_for_search(p).contains(&needle))
                    || c.notes
                        .as_deref()
                        .is_some_and(|n| fold_for_search(n).contains(&needle))
            })
            .collect()
    }
}

/// (stage, position asc, created_at desc), id as deterministic tiebreak
fn compare(a: &Client, b: &Client) -> Ordering {
    a.stage
        .order_index()
        .cmp(&b.stage.order_index())
        .then(
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(Ordering::Equal),
        )
        .then(b.created_at.cmp(&a.created_at))
        .then(a.id.cmp(&b.id))
}

/// Lowercase and strip combining marks so "joao" matches "João"
fn fold_for_search(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, name: &str, stage: Stage, position: f64, created_at: i64) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            phone: None,
            notes: None,
            stage,
            position,
            created_at,
        }
    }

    #[test]
    fn test_sorted_by_stage_then_position() {
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![
            client("c", "C", Stage::Contacted, 1000.0, 0),
            client("b", "B", Stage::New, 2000.0, 0),
            client("a", "A", Stage::New, 1000.0, 0),
        ]);

        let ids: Vec<&str> = collection.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_position_ties_break_newest_first() {
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![
            client("old", "Old", Stage::New, 1000.0, 100),
            client("new", "New", Stage::New, 1000.0, 200),
        ]);

        let ids: Vec<&str> = collection.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_resort_after_stage_patch() {
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![
            client("a", "A", Stage::New, 1000.0, 0),
            client("b", "B", Stage::Proposal, 1000.0, 0),
        ]);

        collection.get_mut("a").expect("missing").stage = Stage::Lost;
        collection.resort();

        let ids: Vec<&str> = collection.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_filter_ignores_case_and_diacritics() {
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![
            client("1", "João Silva", Stage::New, 1000.0, 0),
            client("2", "Maria", Stage::New, 2000.0, 0),
            client("3", "Joana", Stage::New, 3000.0, 0),
        ]);

        let hits = collection.filtered("joao");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "João Silva");
    }

    #[test]
    fn test_filter_searches_phone_and_notes() {
        let mut a = client("1", "Ana", Stage::New, 1000.0, 0);
        a.phone = Some("11 98765-4321".to_string());
        let mut b = client("2", "Bia", Stage::New, 2000.0, 0);
        b.notes = Some("Prefers e-mail contact".to_string());
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![a, b]);

        assert_eq!(collection.filtered("98765").len(), 1);
        assert_eq!(collection.filtered("E-MAIL").len(), 1);
    }

    #[test]
    fn test_filter_preserves_order_and_source() {
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![
            client("1", "Ana Paula", Stage::New, 1000.0, 0),
            client("2", "Bruno", Stage::New, 2000.0, 0),
            client("3", "Paula", Stage::Contacted, 1000.0, 0),
        ]);

        let hits = collection.filtered("paula");
        let ids: Vec<&str> = hits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        // Source collection unchanged
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_blank_filter_matches_everything() {
        let mut collection = ClientCollection::new();
        collection.replace_all(vec![client("1", "Ana", Stage::New, 1000.0, 0)]);
        assert_eq!(collection.filtered("").len(), 1);
        assert_eq!(collection.filtered("   ").len(), 1);
    }
}
