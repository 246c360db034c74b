//! Per-window app sessions owned by the desktop runtime.
//!
//! Every open window carries exactly one [`WindowSession`]. App crates expose headless state
//! machines; this module routes actions into them and translates their effect requests into
//! [`RuntimeEffect`] values tagged with the owning window id.

use desktop_app_contract::{AppLifecycleEvent, ApplicationId};
use desktop_app_email::{EmailAction, EmailEffect, EmailState};
use desktop_app_flashcards::{FlashcardsAction, FlashcardsEffect, FlashcardsState};
use desktop_app_jarvis::{ChatFailure, ChatPhase, JarvisAction, JarvisEffect, JarvisState};
use desktop_app_notes::{NotesAction, NotesEffect, NotesState};
use desktop_app_whiteboard::{WhiteboardAction, WhiteboardState};

use crate::{
    error::ShellError,
    model::{NoticeLevel, ShellPreferences, WindowId},
    reducer::RuntimeEffect,
};

#[derive(Debug, Clone, PartialEq)]
/// Headless state of one hosted app.
pub enum AppSession {
    Notes(NotesState),
    Flashcards(FlashcardsState),
    Email(EmailState),
    Whiteboard(WhiteboardState),
    Jarvis(JarvisState),
}

#[derive(Debug, Clone, PartialEq)]
/// Action addressed to one hosted app.
pub enum AppAction {
    Notes(NotesAction),
    Flashcards(FlashcardsAction),
    Email(EmailAction),
    Whiteboard(WhiteboardAction),
    Jarvis(JarvisAction),
}

#[derive(Debug, Clone, PartialEq)]
/// App session plus the last lifecycle event delivered to it.
pub struct WindowSession {
    pub app: AppSession,
    pub lifecycle: AppLifecycleEvent,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Host work and shell notices produced by one app transition.
pub struct AppOutcome {
    pub effects: Vec<RuntimeEffect>,
    pub notices: Vec<(NoticeLevel, String)>,
}

impl AppOutcome {
    fn effects(effects: Vec<RuntimeEffect>) -> Self {
        Self {
            effects,
            notices: Vec::new(),
        }
    }

    fn warn(&mut self, err: ShellError) {
        self.notices.push((NoticeLevel::Warning, err.to_string()));
    }
}

fn notes_effects(window_id: WindowId, effects: Vec<NotesEffect>) -> Vec<RuntimeEffect> {
    effects
        .into_iter()
        .map(|effect| match effect {
            NotesEffect::Load => RuntimeEffect::LoadNotes { window_id },
        })
        .collect()
}

fn flashcards_effects(window_id: WindowId, effects: Vec<FlashcardsEffect>) -> Vec<RuntimeEffect> {
    effects
        .into_iter()
        .map(|effect| match effect {
            FlashcardsEffect::Load => RuntimeEffect::LoadDecks { window_id },
        })
        .collect()
}

fn email_outcome(window_id: WindowId, effects: Vec<EmailEffect>) -> AppOutcome {
    let mut outcome = AppOutcome::default();
    for effect in effects {
        match effect {
            EmailEffect::LoadFolder(folder) => outcome
                .effects
                .push(RuntimeEffect::LoadMailFolder { window_id, folder }),
            EmailEffect::Send { local_id, email } => outcome.effects.push(RuntimeEffect::SendEmail {
                window_id,
                local_id,
                email,
            }),
            EmailEffect::Notice(text) => outcome.notices.push((NoticeLevel::Warning, text)),
        }
    }
    outcome
}

fn jarvis_effects(window_id: WindowId, effects: Vec<JarvisEffect>) -> Vec<RuntimeEffect> {
    effects
        .into_iter()
        .map(|effect| match effect {
            JarvisEffect::RequestReply { request_id, prompt } => {
                RuntimeEffect::RequestAssistantReply {
                    window_id,
                    request_id,
                    prompt,
                }
            }
            JarvisEffect::CancelReply { request_id } => RuntimeEffect::CancelAssistantReply {
                window_id,
                request_id,
            },
            JarvisEffect::ScheduleTick { at_ms } => {
                RuntimeEffect::ScheduleAppTick { window_id, at_ms }
            }
        })
        .collect()
}

impl AppSession {
    /// Creates fresh state for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::UnknownApp`] for ids without a hosted implementation.
    pub fn new(app_id: &ApplicationId, preferences: &ShellPreferences) -> Result<Self, ShellError> {
        Ok(match app_id.as_str() {
            "notes" => Self::Notes(NotesState::default()),
            "flashcards" => Self::Flashcards(FlashcardsState::default()),
            "email" => Self::Email(EmailState::default()),
            "whiteboard" => Self::Whiteboard(WhiteboardState::default()),
            "jarvis" => Self::Jarvis(JarvisState::new(
                preferences.timeouts.assistant_reply_ms,
            )),
            other => return Err(ShellError::UnknownApp(other.to_string())),
        })
    }

    /// Binds the session to its window and returns the initial host work.
    pub fn mount(&mut self, window_id: WindowId) -> AppOutcome {
        match self {
            Self::Notes(state) => AppOutcome::effects(notes_effects(window_id, state.on_mount())),
            Self::Flashcards(state) => {
                AppOutcome::effects(flashcards_effects(window_id, state.on_mount()))
            }
            Self::Email(state) => email_outcome(window_id, state.on_mount()),
            Self::Whiteboard(state) => {
                state.mount(window_id.0);
                AppOutcome::default()
            }
            Self::Jarvis(_) => AppOutcome::default(),
        }
    }

    /// Routes one action into the session.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::StaleAppEvent`] when the action targets a different app, and
    /// [`ShellError::Validation`] when the email compose form rejects a send. The form keeps the
    /// error for inline display in that case.
    pub fn apply(
        &mut self,
        window_id: WindowId,
        action: AppAction,
        now_ms: u64,
    ) -> Result<AppOutcome, ShellError> {
        let outcome = match (self, action) {
            (Self::Notes(state), AppAction::Notes(action)) => {
                let failure = match &action {
                    NotesAction::Loaded(Err(reason)) => Some(reason.clone()),
                    _ => None,
                };
                let mut outcome = AppOutcome::effects(notes_effects(window_id, state.update(action)));
                if let Some(reason) = failure {
                    outcome.warn(ShellError::service_unavailable("Notes", reason));
                }
                outcome
            }
            (Self::Flashcards(state), AppAction::Flashcards(action)) => {
                let failure = match &action {
                    FlashcardsAction::Loaded(Err(reason)) => Some(reason.clone()),
                    _ => None,
                };
                let mut outcome =
                    AppOutcome::effects(flashcards_effects(window_id, state.update(action)));
                if let Some(reason) = failure {
                    outcome.warn(ShellError::service_unavailable("Decks", reason));
                }
                outcome
            }
            (Self::Email(state), AppAction::Email(action)) => {
                let failure = match &action {
                    EmailAction::FolderLoaded {
                        folder,
                        result: Err(reason),
                    } => Some((folder.label(), reason.clone())),
                    _ => None,
                };
                let mut outcome = email_outcome(window_id, state.update(action)?);
                if let Some((folder, reason)) = failure {
                    outcome.warn(ShellError::service_unavailable(
                        format!("{folder} folder"),
                        reason,
                    ));
                }
                outcome
            }
            (Self::Whiteboard(state), AppAction::Whiteboard(action)) => {
                state.update(action);
                AppOutcome::default()
            }
            (Self::Jarvis(state), AppAction::Jarvis(action)) => {
                AppOutcome::effects(jarvis_effects(window_id, state.update(action, now_ms)))
            }
            _ => return Err(ShellError::StaleAppEvent(window_id)),
        };
        Ok(outcome)
    }

    /// Delivers a scheduled timer tick.
    pub fn tick(&mut self, window_id: WindowId, now_ms: u64) -> AppOutcome {
        let Self::Jarvis(state) = self else {
            return AppOutcome::default();
        };
        let mut outcome =
            AppOutcome::effects(jarvis_effects(window_id, state.update(JarvisAction::Tick, now_ms)));
        if matches!(
            state.phase,
            ChatPhase::Failed {
                failure: ChatFailure::Timeout,
                ..
            }
        ) && !outcome.effects.is_empty()
        {
            outcome.warn(ShellError::ResponseTimeout {
                timeout_ms: state.reply_timeout_ms(),
            });
        }
        outcome
    }

    /// Pauses or resumes render loops while the window is minimized.
    pub fn set_visible(&mut self, visible: bool) {
        if let Self::Whiteboard(state) = self {
            state.set_visible(visible);
        }
    }

    /// Releases resources on close and cancels outstanding host work.
    pub fn release(&mut self, window_id: WindowId) -> Vec<RuntimeEffect> {
        match self {
            Self::Whiteboard(state) => {
                state.release();
                Vec::new()
            }
            Self::Jarvis(state) => state
                .pending_request()
                .map(|request_id| RuntimeEffect::CancelAssistantReply {
                    window_id,
                    request_id,
                })
                .into_iter()
                .collect(),
            Self::Notes(_) | Self::Flashcards(_) | Self::Email(_) => Vec::new(),
        }
    }

    pub fn as_notes(&self) -> Option<&NotesState> {
        match self {
            Self::Notes(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_flashcards(&self) -> Option<&FlashcardsState> {
        match self {
            Self::Flashcards(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_email(&self) -> Option<&EmailState> {
        match self {
            Self::Email(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_whiteboard(&self) -> Option<&WhiteboardState> {
        match self {
            Self::Whiteboard(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_jarvis(&self) -> Option<&JarvisState> {
        match self {
            Self::Jarvis(state) => Some(state),
            _ => None,
        }
    }
}
