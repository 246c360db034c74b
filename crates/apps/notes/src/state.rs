//! Headless notes list state: loading, search, selection and ordering.

use desktop_app_contract::ListState;
use platform_host::NoteRecord;
use serde::{Deserialize, Serialize};

/// Notes window state owned by the desktop runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesState {
    /// Remote note list.
    pub notes: ListState<NoteRecord>,
    /// Current search text.
    pub query: String,
    /// Selected note id.
    pub selected: Option<String>,
}

/// User and host events for the notes window.
#[derive(Debug, Clone, PartialEq)]
pub enum NotesAction {
    /// The notes service answered.
    Loaded(Result<Vec<NoteRecord>, String>),
    /// Search text changed.
    SetQuery(String),
    /// A note row was clicked.
    Select(String),
    /// The user asked for a fresh list.
    Reload,
}

/// Host work requested by the notes state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesEffect {
    /// Fetch the note list.
    Load,
}

impl NotesState {
    /// Effects to run when a notes window opens.
    pub fn on_mount(&self) -> Vec<NotesEffect> {
        vec![NotesEffect::Load]
    }

    /// Applies one action.
    pub fn update(&mut self, action: NotesAction) -> Vec<NotesEffect> {
        match action {
            NotesAction::Loaded(result) => {
                self.notes.apply_result(result, "Notes");
                if let Some(selected) = &self.selected {
                    if !self.notes.items().iter().any(|note| &note.id == selected) {
                        self.selected = None;
                    }
                }
                Vec::new()
            }
            NotesAction::SetQuery(query) => {
                self.query = query;
                Vec::new()
            }
            NotesAction::Select(id) => {
                if self.notes.items().iter().any(|note| note.id == id) {
                    self.selected = Some(id);
                }
                Vec::new()
            }
            NotesAction::Reload => vec![NotesEffect::Load],
        }
    }

    /// Notes matching the search, pinned first, otherwise in service order.
    pub fn visible_notes(&self) -> Vec<&NoteRecord> {
        let needle = self.query.trim().to_lowercase();
        let mut visible: Vec<&NoteRecord> = self
            .notes
            .items()
            .iter()
            .filter(|note| needle.is_empty() || matches_query(note, &needle))
            .collect();
        visible.sort_by_key(|note| !note.is_pinned);
        visible
    }

    /// The selected note, if it is still present.
    pub fn selected_note(&self) -> Option<&NoteRecord> {
        let id = self.selected.as_deref()?;
        self.notes.items().iter().find(|note| note.id == id)
    }
}

fn matches_query(note: &NoteRecord, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn note(id: &str, title: &str, tags: &[&str], pinned: bool) -> NoteRecord {
        NoteRecord {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("body of {title}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_pinned: pinned,
            created_date: String::new(),
        }
    }

    fn loaded() -> NotesState {
        let mut state = NotesState::default();
        state.update(NotesAction::Loaded(Ok(vec![
            note("a", "Ownership", &["rust"], false),
            note("b", "Reading list", &["papers"], true),
            note("c", "Lifetimes", &["Rust"], false),
        ])));
        state
    }

    fn ids(state: &NotesState) -> Vec<&str> {
        state
            .visible_notes()
            .into_iter()
            .map(|note| note.id.as_str())
            .collect()
    }

    #[test]
    fn mount_requests_a_load() {
        assert_eq!(NotesState::default().on_mount(), vec![NotesEffect::Load]);
    }

    #[test]
    fn pinned_notes_sort_first_and_order_is_otherwise_stable() {
        assert_eq!(ids(&loaded()), vec!["b", "a", "c"]);
    }

    #[test]
    fn search_is_case_insensitive_over_tags_and_content() {
        let mut state = loaded();
        state.update(NotesAction::SetQuery("RUST".to_string()));
        assert_eq!(ids(&state), vec!["a", "c"]);
        state.update(NotesAction::SetQuery("body of reading".to_string()));
        assert_eq!(ids(&state), vec!["b"]);
    }

    #[test]
    fn failed_reload_keeps_notes_and_selection() {
        let mut state = loaded();
        state.update(NotesAction::Select("c".to_string()));
        assert_eq!(state.update(NotesAction::Reload), vec![NotesEffect::Load]);
        state.update(NotesAction::Loaded(Err("HTTP 500".to_string())));

        assert_eq!(state.selected_note().map(|n| n.title.as_str()), Some("Lifetimes"));
        assert_eq!(state.notes.notice(), Some("Notes unavailable: HTTP 500"));
    }

    #[test]
    fn selection_is_dropped_when_note_disappears() {
        let mut state = loaded();
        state.update(NotesAction::Select("a".to_string()));
        state.update(NotesAction::Loaded(Ok(vec![note("b", "Reading", &[], true)])));
        assert_eq!(state.selected, None);
        state.update(NotesAction::Select("missing".to_string()));
        assert_eq!(state.selected, None);
    }
}
