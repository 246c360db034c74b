//! Deck browsing and study session state.

use desktop_app_contract::ListState;
use platform_host::{CardRecord, DeckRecord};
use serde::{Deserialize, Serialize};

/// Self-assessment for a flipped card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// The answer was hard to recall.
    Hard,
    /// The answer came easily.
    Easy,
}

/// Tallies shown once a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Deck that was studied.
    pub deck_title: String,
    /// Cards rated hard.
    pub hard: usize,
    /// Cards rated easy.
    pub easy: usize,
}

/// A running pass over one deck's cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    /// Deck id.
    pub deck_id: String,
    /// Deck title.
    pub deck_title: String,
    /// Cards in study order. Never empty.
    pub cards: Vec<CardRecord>,
    /// Current card index.
    pub index: usize,
    /// Whether the answer side is showing.
    pub flipped: bool,
    hard: usize,
    easy: usize,
}

impl StudySession {
    fn start(deck: &DeckRecord) -> Option<Self> {
        if deck.cards.is_empty() {
            return None;
        }
        Some(Self {
            deck_id: deck.id.clone(),
            deck_title: deck.title.clone(),
            cards: deck.cards.clone(),
            index: 0,
            flipped: false,
            hard: 0,
            easy: 0,
        })
    }

    /// The card being studied.
    pub fn current(&self) -> Option<&CardRecord> {
        self.cards.get(self.index)
    }

    /// `"2 / 5"` style progress label.
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.index + 1, self.cards.len())
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            deck_title: self.deck_title.clone(),
            hard: self.hard,
            easy: self.easy,
        }
    }
}

/// Whether the window shows the deck list or a study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    /// Deck list, with the summary of the session that just finished, if any.
    Browsing {
        /// Last completed session.
        last_summary: Option<SessionSummary>,
    },
    /// Studying one deck.
    Studying(StudySession),
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Browsing { last_summary: None }
    }
}

/// Flashcards window state owned by the desktop runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashcardsState {
    /// Remote deck list.
    pub decks: ListState<DeckRecord>,
    /// Current mode.
    pub mode: StudyMode,
}

/// User and host events for the flashcards window.
#[derive(Debug, Clone, PartialEq)]
pub enum FlashcardsAction {
    /// The decks service answered.
    Loaded(Result<Vec<DeckRecord>, String>),
    /// Fetch the deck list again.
    Reload,
    /// Start studying a deck.
    Study(String),
    /// Turn the current card over.
    Flip,
    /// Rate the flipped card and advance.
    Rate(Rating),
    /// Leave the session without a summary.
    ExitSession,
    /// Hide the completed-session summary.
    DismissSummary,
}

/// Host work requested by the flashcards state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardsEffect {
    /// Fetch the deck list.
    Load,
}

impl FlashcardsState {
    /// Effects to run when a flashcards window opens.
    pub fn on_mount(&self) -> Vec<FlashcardsEffect> {
        vec![FlashcardsEffect::Load]
    }

    /// Active study session, if any.
    pub fn session(&self) -> Option<&StudySession> {
        match &self.mode {
            StudyMode::Studying(session) => Some(session),
            StudyMode::Browsing { .. } => None,
        }
    }

    /// Applies one action. Actions that do not fit the current mode are ignored.
    pub fn update(&mut self, action: FlashcardsAction) -> Vec<FlashcardsEffect> {
        match action {
            FlashcardsAction::Loaded(result) => {
                self.decks.apply_result(result, "Decks");
            }
            FlashcardsAction::Reload => return vec![FlashcardsEffect::Load],
            FlashcardsAction::Study(deck_id) => {
                let session = self
                    .decks
                    .items()
                    .iter()
                    .find(|deck| deck.id == deck_id)
                    .and_then(StudySession::start);
                if let Some(session) = session {
                    self.mode = StudyMode::Studying(session);
                }
            }
            FlashcardsAction::Flip => {
                if let StudyMode::Studying(session) = &mut self.mode {
                    session.flipped = !session.flipped;
                }
            }
            FlashcardsAction::Rate(rating) => self.rate(rating),
            FlashcardsAction::ExitSession => {
                if matches!(self.mode, StudyMode::Studying(_)) {
                    self.mode = StudyMode::default();
                }
            }
            FlashcardsAction::DismissSummary => {
                if let StudyMode::Browsing { last_summary } = &mut self.mode {
                    *last_summary = None;
                }
            }
        }
        Vec::new()
    }

    fn rate(&mut self, rating: Rating) {
        let StudyMode::Studying(session) = &mut self.mode else {
            return;
        };
        if !session.flipped {
            return;
        }
        match rating {
            Rating::Hard => session.hard += 1,
            Rating::Easy => session.easy += 1,
        }
        if session.index + 1 < session.cards.len() {
            session.index += 1;
            session.flipped = false;
        } else {
            self.mode = StudyMode::Browsing {
                last_summary: Some(session.summary()),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn deck(id: &str, cards: usize) -> DeckRecord {
        DeckRecord {
            id: id.to_string(),
            title: format!("Deck {id}"),
            description: String::new(),
            cards: (0..cards)
                .map(|i| CardRecord {
                    id: format!("{id}-{i}"),
                    front: format!("front {i}"),
                    back: format!("back {i}"),
                })
                .collect(),
        }
    }

    fn loaded() -> FlashcardsState {
        let mut state = FlashcardsState::default();
        state.update(FlashcardsAction::Loaded(Ok(vec![deck("full", 2), deck("empty", 0)])));
        state
    }

    #[test]
    fn empty_decks_cannot_be_studied() {
        let mut state = loaded();
        state.update(FlashcardsAction::Study("empty".to_string()));
        assert_eq!(state.session(), None);
        state.update(FlashcardsAction::Study("missing".to_string()));
        assert_eq!(state.session(), None);
    }

    #[test]
    fn rating_requires_a_flipped_card() {
        let mut state = loaded();
        state.update(FlashcardsAction::Study("full".to_string()));
        state.update(FlashcardsAction::Rate(Rating::Easy));
        assert_eq!(state.session().map(|s| s.index), Some(0));

        state.update(FlashcardsAction::Flip);
        state.update(FlashcardsAction::Rate(Rating::Easy));
        let session = state.session().expect("still studying");
        assert_eq!(session.index, 1);
        assert!(!session.flipped);
        assert_eq!(session.progress_label(), "2 / 2");
    }

    #[test]
    fn last_card_completes_session_with_tallies() {
        let mut state = loaded();
        state.update(FlashcardsAction::Study("full".to_string()));
        for rating in [Rating::Hard, Rating::Easy] {
            state.update(FlashcardsAction::Flip);
            state.update(FlashcardsAction::Rate(rating));
        }
        assert_eq!(
            state.mode,
            StudyMode::Browsing {
                last_summary: Some(SessionSummary {
                    deck_title: "Deck full".to_string(),
                    hard: 1,
                    easy: 1,
                })
            }
        );
        state.update(FlashcardsAction::DismissSummary);
        assert_eq!(state.mode, StudyMode::default());
    }

    #[test]
    fn exit_discards_progress() {
        let mut state = loaded();
        state.update(FlashcardsAction::Study("full".to_string()));
        state.update(FlashcardsAction::ExitSession);
        assert_eq!(state.mode, StudyMode::default());
    }

    #[test]
    fn failed_first_load_shows_empty_degraded_list() {
        let mut state = FlashcardsState::default();
        assert_eq!(state.on_mount(), vec![FlashcardsEffect::Load]);
        state.update(FlashcardsAction::Loaded(Err("offline".to_string())));
        assert!(state.decks.items().is_empty());
        assert_eq!(state.decks.notice(), Some("Decks unavailable: offline"));
    }
}
