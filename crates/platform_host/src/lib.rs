//! Typed host-domain contracts and shared records used across the desktop runtime and adapters.
//!
//! This crate is the API-first boundary for every external collaborator the shell talks to:
//! authentication, notes, decks, the mailbox, privacy consent, the chat assistant and the
//! preference store. Concrete browser adapters live in `platform_host_web`; the in-memory
//! adapters here back tests and the demo host.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod assistant;
pub mod auth;
pub mod consent;
pub mod content;
pub mod host;
pub mod mail;
pub mod storage;
pub mod time;

mod outage;

pub use outage::Outage;

pub use assistant::service::{
    canned_reply, AssistantFuture, AssistantService, MemoryAssistantService,
    NoopAssistantService,
};
pub use assistant::types::{AssistantPrompt, AssistantTurn, ChatRole};
pub use auth::service::{AuthFuture, AuthService, MemoryAuthService, NoopAuthService};
pub use auth::tokens::{
    clear_session_tokens, load_session_tokens, save_session_tokens, Credentials, TokenPair,
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
pub use consent::{ConsentFuture, ConsentRecord, ConsentService, MemoryConsentService};
pub use content::service::{
    ContentFuture, DecksService, MemoryDecksService, MemoryNotesService, NotesService,
};
pub use content::types::{CardRecord, DeckRecord, NoteRecord};
pub use host::{HostServices, HostStrategy};
pub use mail::service::{MailboxFuture, MailboxService, MemoryMailboxService};
pub use mail::types::{EmailId, EmailRecord, MailFolder, OutgoingEmail};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture,
};
pub use time::{deadline_after, is_past_deadline, unix_time_ms_now};
