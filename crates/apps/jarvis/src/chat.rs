//! Context-aware chat session: shared linear history, bounded reply waits and retry.

use platform_host::{deadline_after, is_past_deadline, AssistantPrompt, AssistantTurn, ChatRole};
use serde::{Deserialize, Serialize};

/// Default bound on one assistant reply.
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 30_000;

const GREETING: &str = "Hello! I am Jarvis. How can I help you today?";

/// Selectable assistant persona.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatContext {
    /// Helpful assistant for any task.
    #[default]
    General,
    /// Programming queries.
    CodeCompanion,
    /// Writing emails.
    EmailDrafter,
    /// Creative ideas.
    Brainstorming,
}

impl ChatContext {
    /// Sidebar order.
    pub const ALL: [Self; 4] = [
        Self::General,
        Self::CodeCompanion,
        Self::EmailDrafter,
        Self::Brainstorming,
    ];

    /// Wire token sent to the assistant collaborator.
    pub const fn token(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::CodeCompanion => "coding",
            Self::EmailDrafter => "email",
            Self::Brainstorming => "brainstorming",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General Chat",
            Self::CodeCompanion => "Code Companion",
            Self::EmailDrafter => "Email Drafter",
            Self::Brainstorming => "Brainstorming",
        }
    }

    /// Short icon glyph.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::General => "#",
            Self::CodeCompanion => "</>",
            Self::EmailDrafter => "@",
            Self::Brainstorming => "*",
        }
    }

    /// One-line description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::General => "Helpful assistant for any task",
            Self::CodeCompanion => "Optimized for programming queries",
            Self::EmailDrafter => "Assistance with writing emails",
            Self::Brainstorming => "Generate creative ideas",
        }
    }
}

/// One chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Session-local id.
    pub id: u64,
    /// Author.
    pub role: ChatRole,
    /// Text (markdown-ish, rendered as plain text).
    pub content: String,
    /// Context active when the message was written.
    pub context: ChatContext,
}

/// Why the last turn failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatFailure {
    /// No reply within the bound.
    Timeout,
    /// The collaborator answered with an error.
    Collaborator(String),
}

impl ChatFailure {
    /// User-facing text.
    pub fn message(&self) -> String {
        match self {
            Self::Timeout => "Jarvis did not answer in time.".to_string(),
            Self::Collaborator(reason) => format!("Jarvis is unavailable: {reason}"),
        }
    }
}

/// Turn phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatPhase {
    /// Ready for input.
    #[default]
    Idle,
    /// Request issued; the host has not started it yet.
    Sending {
        /// Request id guarding the reply.
        request_id: u64,
        /// Absolute reply deadline.
        deadline_ms: u64,
    },
    /// The host is waiting on the collaborator.
    AwaitingResponse {
        /// Request id guarding the reply.
        request_id: u64,
        /// Absolute reply deadline.
        deadline_ms: u64,
    },
    /// The last turn failed; the session stays usable.
    Failed {
        /// Failure cause.
        failure: ChatFailure,
        /// User text re-sent by retry.
        retry_text: String,
    },
}

impl ChatPhase {
    /// Stable token for `data-state`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sending { .. } => "sending",
            Self::AwaitingResponse { .. } => "awaiting-response",
            Self::Failed { .. } => "failed",
        }
    }

    fn in_flight(&self) -> Option<(u64, u64)> {
        match *self {
            Self::Sending {
                request_id,
                deadline_ms,
            }
            | Self::AwaitingResponse {
                request_id,
                deadline_ms,
            } => Some((request_id, deadline_ms)),
            Self::Idle | Self::Failed { .. } => None,
        }
    }
}

/// User, host and timer events for the chat window.
#[derive(Debug, Clone, PartialEq)]
pub enum JarvisAction {
    /// Context button clicked.
    SelectContext(ChatContext),
    /// Input text changed.
    EditDraft(String),
    /// Send button or Enter.
    Send,
    /// The host started the collaborator call.
    ReplyDispatched {
        /// Request id from [`JarvisEffect::RequestReply`].
        request_id: u64,
    },
    /// The collaborator finished.
    ReplyReceived {
        /// Request id from [`JarvisEffect::RequestReply`].
        request_id: u64,
        /// Reply text or failure reason.
        result: Result<String, String>,
    },
    /// Retry button clicked.
    Retry,
    /// Timer fired.
    Tick,
    /// Context sidebar toggle clicked.
    ToggleContextPanel,
}

/// Host work requested by the chat state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JarvisEffect {
    /// Ask the collaborator for a reply.
    RequestReply {
        /// Request id to echo back.
        request_id: u64,
        /// Prompt sent to the collaborator.
        prompt: AssistantPrompt,
    },
    /// Abandon an in-flight request.
    CancelReply {
        /// Request id to abort.
        request_id: u64,
    },
    /// Deliver a [`JarvisAction::Tick`] at `at_ms`.
    ScheduleTick {
        /// Absolute time.
        at_ms: u64,
    },
}

/// Chat window state owned by the desktop runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JarvisState {
    /// Active context.
    pub context: ChatContext,
    /// Shared linear history, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Input box text.
    pub draft: String,
    /// Turn phase.
    pub phase: ChatPhase,
    /// Whether the context sidebar is expanded.
    pub context_panel_open: bool,
    reply_timeout_ms: u64,
    next_message_id: u64,
    next_request_id: u64,
}

impl Default for JarvisState {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_TIMEOUT_MS)
    }
}

impl JarvisState {
    /// New session with the greeting and the given reply bound.
    pub fn new(reply_timeout_ms: u64) -> Self {
        Self {
            context: ChatContext::General,
            messages: vec![ChatMessage {
                id: 1,
                role: ChatRole::Assistant,
                content: GREETING.to_string(),
                context: ChatContext::General,
            }],
            draft: String::new(),
            phase: ChatPhase::Idle,
            context_panel_open: true,
            reply_timeout_ms,
            next_message_id: 2,
            next_request_id: 1,
        }
    }

    /// Input placeholder for the active context.
    pub fn placeholder(&self) -> String {
        format!("Message Jarvis in {}...", self.context.label())
    }

    /// Whether a reply is outstanding.
    pub fn is_busy(&self) -> bool {
        self.phase.in_flight().is_some()
    }

    /// Whether Send would start a turn.
    pub fn can_send(&self) -> bool {
        !self.is_busy() && !self.draft.trim().is_empty()
    }

    /// Bound on one assistant reply.
    pub fn reply_timeout_ms(&self) -> u64 {
        self.reply_timeout_ms
    }

    /// Request id of the outstanding reply, if any.
    pub fn pending_request(&self) -> Option<u64> {
        self.phase.in_flight().map(|(request_id, _)| request_id)
    }

    /// Applies one action at `now_ms`.
    pub fn update(&mut self, action: JarvisAction, now_ms: u64) -> Vec<JarvisEffect> {
        match action {
            JarvisAction::SelectContext(context) => {
                self.context = context;
                Vec::new()
            }
            JarvisAction::EditDraft(text) => {
                self.draft = text;
                Vec::new()
            }
            JarvisAction::ToggleContextPanel => {
                self.context_panel_open = !self.context_panel_open;
                Vec::new()
            }
            JarvisAction::Send => {
                if !self.can_send() {
                    return Vec::new();
                }
                let text = std::mem::take(&mut self.draft).trim().to_string();
                self.push_message(ChatRole::User, text.clone(), self.context);
                self.start_turn(text, now_ms)
            }
            JarvisAction::Retry => match &self.phase {
                ChatPhase::Failed { retry_text, .. } => {
                    let text = retry_text.clone();
                    self.start_turn(text, now_ms)
                }
                _ => Vec::new(),
            },
            JarvisAction::ReplyDispatched { request_id } => {
                if let ChatPhase::Sending {
                    request_id: pending,
                    deadline_ms,
                } = self.phase
                {
                    if pending == request_id {
                        self.phase = ChatPhase::AwaitingResponse {
                            request_id,
                            deadline_ms,
                        };
                    }
                }
                Vec::new()
            }
            JarvisAction::ReplyReceived { request_id, result } => {
                if self.pending_request() != Some(request_id) {
                    return Vec::new();
                }
                match result {
                    Ok(reply) => {
                        let context = self.last_user_message().map_or(self.context, |m| m.context);
                        self.push_message(ChatRole::Assistant, reply, context);
                        self.phase = ChatPhase::Idle;
                    }
                    Err(reason) => self.fail(ChatFailure::Collaborator(reason)),
                }
                Vec::new()
            }
            JarvisAction::Tick => match self.phase.in_flight() {
                Some((request_id, deadline_ms)) if is_past_deadline(now_ms, deadline_ms) => {
                    self.fail(ChatFailure::Timeout);
                    vec![JarvisEffect::CancelReply { request_id }]
                }
                // Early timer: re-arm so the wait stays bounded.
                Some((_, deadline_ms)) => vec![JarvisEffect::ScheduleTick { at_ms: deadline_ms }],
                None => Vec::new(),
            },
        }
    }

    fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
    }

    fn push_message(&mut self, role: ChatRole, content: String, context: ChatContext) {
        self.messages.push(ChatMessage {
            id: self.next_message_id,
            role,
            content,
            context,
        });
        self.next_message_id += 1;
    }

    fn fail(&mut self, failure: ChatFailure) {
        let retry_text = self
            .last_user_message()
            .map(|message| message.content.clone())
            .unwrap_or_default();
        self.phase = ChatPhase::Failed {
            failure,
            retry_text,
        };
    }

    fn start_turn(&mut self, text: String, now_ms: u64) -> Vec<JarvisEffect> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let deadline_ms = deadline_after(now_ms, self.reply_timeout_ms);
        self.phase = ChatPhase::Sending {
            request_id,
            deadline_ms,
        };
        vec![
            JarvisEffect::RequestReply {
                request_id,
                prompt: self.prompt_for(text),
            },
            JarvisEffect::ScheduleTick { at_ms: deadline_ms },
        ]
    }

    /// History excludes the trailing user message, which travels as `message`.
    fn prompt_for(&self, text: String) -> AssistantPrompt {
        let earlier = match self.messages.split_last() {
            Some((last, rest)) if last.role == ChatRole::User => rest,
            _ => &self.messages[..],
        };
        AssistantPrompt {
            context: self.context.token().to_string(),
            context_label: self.context.label().to_string(),
            message: text,
            history: earlier
                .iter()
                .map(|message| AssistantTurn {
                    role: message.role,
                    content: message.content.clone(),
                    context: message.context.token().to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn send(state: &mut JarvisState, text: &str, now_ms: u64) -> Vec<JarvisEffect> {
        state.update(JarvisAction::EditDraft(text.to_string()), now_ms);
        state.update(JarvisAction::Send, now_ms)
    }

    fn request_id(effects: &[JarvisEffect]) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                JarvisEffect::RequestReply { request_id, .. } => Some(*request_id),
                _ => None,
            })
            .expect("request effect")
    }

    #[test]
    fn code_companion_changes_placeholder_without_touching_history() {
        let mut state = JarvisState::default();
        assert_eq!(state.placeholder(), "Message Jarvis in General Chat...");
        state.update(JarvisAction::SelectContext(ChatContext::CodeCompanion), 0);

        assert!(state.placeholder().contains("Code Companion"));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, GREETING);
    }

    #[test]
    fn send_appends_one_user_message_then_one_reply() {
        let mut state = JarvisState::new(1_000);
        state.update(JarvisAction::SelectContext(ChatContext::CodeCompanion), 0);
        let effects = send(&mut state, "Hello", 10);

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].role, ChatRole::User);
        assert_eq!(state.messages[1].context, ChatContext::CodeCompanion);
        assert_eq!(state.draft, "");
        assert_eq!(state.phase.as_str(), "sending");
        assert!(effects.contains(&JarvisEffect::ScheduleTick { at_ms: 1_010 }));

        let id = request_id(&effects);
        match &effects[0] {
            JarvisEffect::RequestReply { prompt, .. } => {
                assert_eq!(prompt.context, "coding");
                assert_eq!(prompt.message, "Hello");
                assert_eq!(prompt.history.len(), 1);
            }
            other => panic!("unexpected effect {other:?}"),
        }

        state.update(JarvisAction::ReplyDispatched { request_id: id }, 20);
        assert_eq!(state.phase.as_str(), "awaiting-response");
        state.update(
            JarvisAction::ReplyReceived {
                request_id: id,
                result: Ok("Hi".to_string()),
            },
            30,
        );

        assert_eq!(state.phase, ChatPhase::Idle);
        assert_eq!(state.messages.len(), 3);
        assert_eq!(state.messages[2].role, ChatRole::Assistant);
    }

    #[test]
    fn blank_draft_and_busy_session_do_not_send() {
        let mut state = JarvisState::default();
        assert!(send(&mut state, "   ", 0).is_empty());
        send(&mut state, "first", 0);
        assert!(send(&mut state, "second", 0).is_empty());
        assert_eq!(state.messages.len(), 2);
    }

    #[test]
    fn deadline_moves_to_timeout_and_cancels_the_request() {
        let mut state = JarvisState::new(500);
        let id = request_id(&send(&mut state, "ping", 100));

        assert_eq!(
            state.update(JarvisAction::Tick, 599),
            vec![JarvisEffect::ScheduleTick { at_ms: 600 }]
        );
        assert_eq!(state.phase.as_str(), "sending");
        let effects = state.update(JarvisAction::Tick, 600);

        assert_eq!(effects, vec![JarvisEffect::CancelReply { request_id: id }]);
        assert_eq!(
            state.phase,
            ChatPhase::Failed {
                failure: ChatFailure::Timeout,
                retry_text: "ping".to_string(),
            }
        );
    }

    #[test]
    fn late_reply_after_timeout_is_ignored() {
        let mut state = JarvisState::new(500);
        let id = request_id(&send(&mut state, "ping", 0));
        state.update(JarvisAction::Tick, 500);
        state.update(
            JarvisAction::ReplyReceived {
                request_id: id,
                result: Ok("late".to_string()),
            },
            900,
        );
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.phase.as_str(), "failed");
    }

    #[test]
    fn retry_reissues_without_duplicating_the_user_message() {
        let mut state = JarvisState::new(500);
        let first = request_id(&send(&mut state, "ping", 0));
        state.update(
            JarvisAction::ReplyReceived {
                request_id: first,
                result: Err("502".to_string()),
            },
            10,
        );
        assert_eq!(
            state.phase,
            ChatPhase::Failed {
                failure: ChatFailure::Collaborator("502".to_string()),
                retry_text: "ping".to_string(),
            }
        );

        let effects = state.update(JarvisAction::Retry, 20);
        let second = request_id(&effects);
        assert_ne!(first, second);
        match &effects[0] {
            JarvisEffect::RequestReply { prompt, .. } => {
                assert_eq!(prompt.message, "ping");
                assert_eq!(prompt.history.len(), 1);
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert_eq!(
            state
                .messages
                .iter()
                .filter(|m| m.role == ChatRole::User)
                .count(),
            1
        );
    }

    #[test]
    fn context_switch_mid_turn_frames_only_the_next_turn() {
        let mut state = JarvisState::default();
        let id = request_id(&send(&mut state, "idea?", 0));
        state.update(JarvisAction::SelectContext(ChatContext::Brainstorming), 1);
        state.update(
            JarvisAction::ReplyReceived {
                request_id: id,
                result: Ok("sure".to_string()),
            },
            2,
        );
        send(&mut state, "more", 3);

        let contexts: Vec<_> = state.messages.iter().map(|m| m.context).collect();
        assert_eq!(
            contexts,
            vec![
                ChatContext::General,
                ChatContext::General,
                ChatContext::General,
                ChatContext::Brainstorming,
            ]
        );
    }
}
