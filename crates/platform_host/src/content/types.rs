//! Wire records for notes and flashcard decks.

use serde::{Deserialize, Serialize};

/// One note as returned by the notes list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Stable note id.
    pub id: String,
    /// Note title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Pinned notes sort before the rest.
    #[serde(default)]
    pub is_pinned: bool,
    /// Creation date as reported by the backend.
    #[serde(default)]
    pub created_date: String,
}

/// One flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Stable card id.
    pub id: String,
    /// Prompt side.
    pub front: String,
    /// Answer side.
    pub back: String,
}

/// A flashcard deck with its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    /// Stable deck id.
    pub id: String,
    /// Deck title.
    pub title: String,
    /// Short description shown under the title.
    #[serde(default)]
    pub description: String,
    /// Cards in study order.
    #[serde(default)]
    pub cards: Vec<CardRecord>,
}
