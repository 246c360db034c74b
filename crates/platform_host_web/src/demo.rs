//! Seeded in-memory services for the `demo-host` build.
//!
//! The demo host needs no backend: any non-empty credentials sign in, notes/decks/mail come
//! from fixed seeds, and the assistant answers after a short simulated delay.

use std::rc::Rc;

use platform_host::{
    canned_reply, AssistantFuture, AssistantPrompt, AssistantService, AuthFuture, AuthService,
    CardRecord, ConsentRecord, Credentials, DeckRecord, EmailId, EmailRecord, HostServices,
    HostStrategy, MailFolder, MemoryConsentService, MemoryDecksService, MemoryMailboxService,
    MemoryNotesService, NoteRecord, TokenPair,
};

use crate::{bridge::sleep_ms, WebPrefsStore};

const DEMO_TOKEN_PREFIX: &str = "demo-";
const DEMO_REPLY_DELAY_MS: u32 = 1_000;

#[derive(Debug, Clone, Copy, Default)]
/// Auth service that accepts any non-empty credentials and any `demo-` token.
pub struct DemoAuthService;

fn demo_pair(subject: &str) -> TokenPair {
    let slug: String = subject
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    TokenPair {
        access_token: format!("{DEMO_TOKEN_PREFIX}access-{slug}"),
        refresh_token: format!("{DEMO_TOKEN_PREFIX}refresh-{slug}"),
    }
}

impl AuthService for DemoAuthService {
    fn validate<'a>(&'a self, access_token: &'a str) -> AuthFuture<'a, Result<bool, String>> {
        Box::pin(async move { Ok(access_token.starts_with(DEMO_TOKEN_PREFIX)) })
    }

    fn refresh<'a>(&'a self, refresh_token: &'a str) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async move {
            refresh_token
                .strip_prefix("demo-refresh-")
                .map(demo_pair)
                .ok_or_else(|| "refresh token rejected".to_string())
        })
    }

    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async move {
            if credentials.email.trim().is_empty() || credentials.password.is_empty() {
                return Err("email and password are required".to_string());
            }
            Ok(demo_pair(&credentials.email))
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Assistant that replies with the canned acknowledgement after a short delay.
pub struct DemoAssistantService;

impl AssistantService for DemoAssistantService {
    fn reply<'a>(
        &'a self,
        prompt: &'a AssistantPrompt,
    ) -> AssistantFuture<'a, Result<String, String>> {
        Box::pin(async move {
            sleep_ms(DEMO_REPLY_DELAY_MS).await;
            Ok(canned_reply(prompt))
        })
    }
}

fn note(id: &str, title: &str, content: &str, tags: &[&str], pinned: bool) -> NoteRecord {
    NoteRecord {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_pinned: pinned,
        created_date: "2024-09-01".to_string(),
    }
}

fn card(id: &str, front: &str, back: &str) -> CardRecord {
    CardRecord {
        id: id.to_string(),
        front: front.to_string(),
        back: back.to_string(),
    }
}

fn email(
    id: &str,
    sender: &str,
    subject: &str,
    snippet: &str,
    date: &str,
    read: bool,
) -> EmailRecord {
    EmailRecord {
        id: EmailId(id.to_string()),
        sender: sender.to_string(),
        subject: subject.to_string(),
        snippet: snippet.to_string(),
        body: snippet.trim_end_matches("...").to_string(),
        date: date.to_string(),
        is_read: read,
    }
}

/// Seed notes.
pub fn seed_notes() -> Vec<NoteRecord> {
    vec![
        note(
            "note-1",
            "Lecture 4: Ownership",
            "Moves, borrows and lifetimes.",
            &["rust", "lecture"],
            false,
        ),
        note(
            "note-2",
            "Reading list",
            "Distributed systems papers for the seminar.",
            &["reading"],
            true,
        ),
        note(
            "note-3",
            "Quidditch schedule",
            "Practice on Tuesdays and Thursdays.",
            &["personal"],
            false,
        ),
    ]
}

/// Seed decks; the last one is empty so the empty-deck path is reachable.
pub fn seed_decks() -> Vec<DeckRecord> {
    vec![
        DeckRecord {
            id: "deck-1".to_string(),
            title: "Spanish Basics".to_string(),
            description: "Everyday vocabulary".to_string(),
            cards: vec![
                card("c1", "Hola", "Hello"),
                card("c2", "Gracias", "Thank you"),
                card("c3", "Biblioteca", "Library"),
            ],
        },
        DeckRecord {
            id: "deck-2".to_string(),
            title: "Organic Chemistry".to_string(),
            description: "Functional groups".to_string(),
            cards: vec![card("c4", "-OH", "Hydroxyl"), card("c5", "-COOH", "Carboxyl")],
        },
        DeckRecord {
            id: "deck-3".to_string(),
            title: "New Deck".to_string(),
            description: String::new(),
            cards: Vec::new(),
        },
    ]
}

/// Seed inbox.
pub fn seed_inbox() -> Vec<EmailRecord> {
    vec![
        email(
            "1",
            "Alice Smith",
            "Project Update: Q4 Roadmap",
            "Hey team, just wanted to share the latest updates...",
            "10:42 AM",
            false,
        ),
        email(
            "2",
            "GitHub Notifications",
            "New Pull Request: Feature/Kanban",
            "@jules opened a new pull request...",
            "Yesterday",
            true,
        ),
        email(
            "3",
            "Newsletter",
            "Weekly Tech Digest",
            "Top stories in tech this week...",
            "Mon",
            true,
        ),
    ]
}

fn seed_consent() -> Vec<ConsentRecord> {
    ["calendar", "email", "browsing"]
        .into_iter()
        .enumerate()
        .map(|(index, source)| ConsentRecord {
            context_type: source.to_string(),
            is_enabled: index != 2,
            updated_at: None,
        })
        .collect()
}

/// Builds the seeded demo bundle. Tokens and preferences still persist in `localStorage`.
pub fn demo_host_services() -> HostServices {
    let inbox = seed_inbox();
    let starred = inbox.iter().take(1).cloned().collect();
    HostServices {
        prefs: Rc::new(WebPrefsStore),
        auth: Rc::new(DemoAuthService),
        notes: Rc::new(MemoryNotesService::with_notes(seed_notes())),
        decks: Rc::new(MemoryDecksService::with_decks(seed_decks())),
        mailbox: Rc::new(
            MemoryMailboxService::default()
                .with_folder(MailFolder::Inbox, inbox)
                .with_folder(MailFolder::Starred, starred),
        ),
        consent: Rc::new(MemoryConsentService::with_records(seed_consent())),
        assistant: Rc::new(DemoAssistantService),
        host_strategy: HostStrategy::Demo,
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn demo_auth_round_trips_its_own_tokens() {
        let creds = Credentials {
            email: "harry@hogwarts.edu".to_string(),
            password: "nimbus".to_string(),
        };
        let pair = block_on(DemoAuthService.sign_in(&creds)).expect("sign in");
        assert_eq!(block_on(DemoAuthService.validate(&pair.access_token)), Ok(true));
        assert_eq!(block_on(DemoAuthService.validate("forged")), Ok(false));
        let refreshed = block_on(DemoAuthService.refresh(&pair.refresh_token)).expect("refresh");
        assert_eq!(refreshed, pair);
    }

    #[test]
    fn demo_bundle_serves_seeded_mail() {
        let host = demo_host_services();
        let inbox = block_on(host.mailbox.list(MailFolder::Inbox)).expect("inbox");
        assert_eq!(inbox.len(), 3);
        assert_eq!(host.host_strategy, HostStrategy::Demo);
        assert!(seed_decks().iter().any(|deck| deck.cards.is_empty()));
    }
}
