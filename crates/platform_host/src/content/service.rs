//! Notes and decks list contracts with in-memory adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use crate::{outage::Outage, DeckRecord, NoteRecord};

/// Object-safe boxed future used by the content list services.
pub type ContentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External notes store.
pub trait NotesService {
    /// Lists every note visible to the current session.
    fn list(&self) -> ContentFuture<'_, Result<Vec<NoteRecord>, String>>;
}

/// External flashcard deck store.
pub trait DecksService {
    /// Lists every deck visible to the current session.
    fn list(&self) -> ContentFuture<'_, Result<Vec<DeckRecord>, String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory notes store.
pub struct MemoryNotesService {
    notes: Rc<RefCell<Vec<NoteRecord>>>,
    outage: Outage,
}

impl MemoryNotesService {
    /// Creates a store seeded with `notes`.
    pub fn with_notes(notes: Vec<NoteRecord>) -> Self {
        Self {
            notes: Rc::new(RefCell::new(notes)),
            outage: Outage::default(),
        }
    }

    /// Makes `list` fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.outage.set(reason);
    }
}

impl NotesService for MemoryNotesService {
    fn list(&self) -> ContentFuture<'_, Result<Vec<NoteRecord>, String>> {
        Box::pin(async move {
            self.outage.check()?;
            Ok(self.notes.borrow().clone())
        })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory deck store.
pub struct MemoryDecksService {
    decks: Rc<RefCell<Vec<DeckRecord>>>,
    outage: Outage,
}

impl MemoryDecksService {
    /// Creates a store seeded with `decks`.
    pub fn with_decks(decks: Vec<DeckRecord>) -> Self {
        Self {
            decks: Rc::new(RefCell::new(decks)),
            outage: Outage::default(),
        }
    }

    /// Makes `list` fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.outage.set(reason);
    }
}

impl DecksService for MemoryDecksService {
    fn list(&self) -> ContentFuture<'_, Result<Vec<DeckRecord>, String>> {
        Box::pin(async move {
            self.outage.check()?;
            Ok(self.decks.borrow().clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notes_list_fails_only_during_outage() {
        let notes = MemoryNotesService::with_notes(vec![NoteRecord {
            id: "n1".to_string(),
            title: "Potions".to_string(),
            content: String::new(),
            tags: vec![],
            is_pinned: false,
            created_date: String::new(),
        }]);
        let service: &dyn NotesService = &notes;

        notes.set_unavailable(Some("network down"));
        assert_eq!(block_on(service.list()), Err("network down".to_string()));
        notes.set_unavailable(None);
        assert_eq!(block_on(service.list()).expect("list").len(), 1);
    }

    #[test]
    fn deck_records_accept_missing_optional_fields() {
        let deck: DeckRecord =
            serde_json::from_str(r#"{"id":"d1","title":"Spells"}"#).expect("parse deck");
        assert!(deck.cards.is_empty());
        assert_eq!(deck.description, "");
    }
}
