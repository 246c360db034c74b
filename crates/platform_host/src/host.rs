//! Host service bundle injected into the shared desktop runtime.

use std::rc::Rc;

use crate::{
    AssistantService, AuthService, ConsentService, DecksService, MailboxService,
    MemoryAssistantService, MemoryAuthService, MemoryConsentService, MemoryDecksService,
    MemoryMailboxService, MemoryNotesService, MemoryPrefsStore, NotesService, PrefsStore,
};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser composition talking to the FocusDeck HTTP API.
    Http,
    /// Browser composition with seeded in-memory services.
    Demo,
    /// In-memory composition used by tests and non-browser targets.
    Headless,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Demo => "demo",
            Self::Headless => "headless",
        }
    }
}

/// Runtime-selected collaborator bundle.
///
/// All environment-specific selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime and app crates decoupled from transport details.
#[derive(Clone)]
pub struct HostServices {
    /// Lightweight preference store (layout, theme, session tokens).
    pub prefs: Rc<dyn PrefsStore>,
    /// Token validation, refresh and sign-in.
    pub auth: Rc<dyn AuthService>,
    /// Notes listing.
    pub notes: Rc<dyn NotesService>,
    /// Flashcard deck listing.
    pub decks: Rc<dyn DecksService>,
    /// Mailbox folders and send.
    pub mailbox: Rc<dyn MailboxService>,
    /// Privacy consent records.
    pub consent: Rc<dyn ConsentService>,
    /// Chat assistant reply collaborator.
    pub assistant: Rc<dyn AssistantService>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds an empty in-memory bundle.
    pub fn headless() -> Self {
        Self {
            prefs: Rc::new(MemoryPrefsStore::default()),
            auth: Rc::new(MemoryAuthService::default()),
            notes: Rc::new(MemoryNotesService::default()),
            decks: Rc::new(MemoryDecksService::default()),
            mailbox: Rc::new(MemoryMailboxService::default()),
            consent: Rc::new(MemoryConsentService::default()),
            assistant: Rc::new(MemoryAssistantService::default()),
            host_strategy: HostStrategy::Headless,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
