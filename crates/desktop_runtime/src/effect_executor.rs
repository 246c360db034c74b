//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use std::{cell::RefCell, collections::HashMap, rc::Rc, time::Duration};

use desktop_app_email::EmailAction;
use desktop_app_flashcards::FlashcardsAction;
use desktop_app_jarvis::JarvisAction;
use desktop_app_notes::NotesAction;
use futures::future::{AbortHandle, Abortable, Aborted};
use leptos::*;
use platform_host::unix_time_ms_now;

use crate::{
    app_runtime::AppAction,
    dom,
    model::WindowId,
    persistence,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

/// Abort handles for in-flight assistant replies, keyed by window and request id.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    handles: Rc<RefCell<HashMap<(WindowId, u64), AbortHandle>>>,
}

impl TaskRegistry {
    pub fn register(&self, window_id: WindowId, request_id: u64, handle: AbortHandle) {
        if let Some(previous) = self
            .handles
            .borrow_mut()
            .insert((window_id, request_id), handle)
        {
            previous.abort();
        }
    }

    pub fn finish(&self, window_id: WindowId, request_id: u64) {
        self.handles.borrow_mut().remove(&(window_id, request_id));
    }

    /// Aborts the task if it is still running. Returns whether one was found.
    pub fn abort(&self, window_id: WindowId, request_id: u64) -> bool {
        match self.handles.borrow_mut().remove(&(window_id, request_id)) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the current queue before processing so nested dispatches enqueue a fresh batch instead
    // of being overwritten by the in-flight drain.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_runtime_effect(runtime, effect);
        }
    });
}

fn dispatch_app(runtime: DesktopRuntimeContext, window_id: WindowId, action: AppAction) {
    runtime.dispatch_action(DesktopAction::App { window_id, action });
}

fn schedule_at(runtime: DesktopRuntimeContext, at_ms: u64, action: DesktopAction) {
    let delay = Duration::from_millis(at_ms.saturating_sub(unix_time_ms_now()));
    set_timeout(move || runtime.dispatch_action(action), delay);
}

fn run_runtime_effect(runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
    let host = runtime.host.get_value();
    match effect {
        RuntimeEffect::PersistLayout => {
            let state = runtime.store.get_value().state();
            spawn_local(async move {
                if let Err(err) =
                    persistence::persist_layout_snapshot(host.prefs.as_ref(), &state).await
                {
                    logging::warn!("persist layout failed: {err}");
                }
            });
        }
        RuntimeEffect::PersistTheme => {
            let theme = runtime.store.get_value().with_state(|s| s.theme.clone());
            spawn_local(async move {
                if let Err(err) = persistence::persist_theme(host.prefs.as_ref(), &theme).await {
                    logging::warn!("persist theme failed: {err}");
                }
            });
        }
        RuntimeEffect::FocusWindowInput(window_id) => {
            let app_id = runtime
                .store
                .get_value()
                .with_state(|s| s.window(window_id).map(|w| w.app_id.clone()));
            if let Some(app_id) = app_id {
                request_animation_frame(move || {
                    dom::focus_first_match(&dom::window_primary_input_selector(&app_id));
                });
            }
        }
        RuntimeEffect::ScheduleStartMenuTick { at_ms } => {
            schedule_at(runtime, at_ms, DesktopAction::StartMenuTick);
        }
        RuntimeEffect::LoadConsent => spawn_local(async move {
            let result = host.consent.get_consent().await;
            runtime.dispatch_action(DesktopAction::ConsentLoaded { result });
        }),
        RuntimeEffect::LoadNotes { window_id } => spawn_local(async move {
            let result = host.notes.list().await;
            dispatch_app(
                runtime,
                window_id,
                AppAction::Notes(NotesAction::Loaded(result)),
            );
        }),
        RuntimeEffect::LoadDecks { window_id } => spawn_local(async move {
            let result = host.decks.list().await;
            dispatch_app(
                runtime,
                window_id,
                AppAction::Flashcards(FlashcardsAction::Loaded(result)),
            );
        }),
        RuntimeEffect::LoadMailFolder { window_id, folder } => spawn_local(async move {
            let result = host.mailbox.list(folder).await;
            dispatch_app(
                runtime,
                window_id,
                AppAction::Email(EmailAction::FolderLoaded { folder, result }),
            );
        }),
        RuntimeEffect::SendEmail {
            window_id,
            local_id,
            email,
        } => spawn_local(async move {
            let result = host.mailbox.send(&email).await;
            dispatch_app(
                runtime,
                window_id,
                AppAction::Email(EmailAction::SendFinished { local_id, result }),
            );
        }),
        RuntimeEffect::RequestAssistantReply {
            window_id,
            request_id,
            prompt,
        } => {
            dispatch_app(
                runtime,
                window_id,
                AppAction::Jarvis(JarvisAction::ReplyDispatched { request_id }),
            );
            let tasks = runtime.tasks.get_value();
            let (handle, registration) = AbortHandle::new_pair();
            tasks.register(window_id, request_id, handle);
            let reply = Abortable::new(
                async move { host.assistant.reply(&prompt).await },
                registration,
            );
            spawn_local(async move {
                let outcome = reply.await;
                tasks.finish(window_id, request_id);
                match outcome {
                    Ok(result) => dispatch_app(
                        runtime,
                        window_id,
                        AppAction::Jarvis(JarvisAction::ReplyReceived { request_id, result }),
                    ),
                    Err(Aborted) => {
                        logging::debug_warn!(
                            "assistant reply {request_id} for window {window_id} aborted"
                        );
                    }
                }
            });
        }
        RuntimeEffect::CancelAssistantReply {
            window_id,
            request_id,
        } => {
            runtime.tasks.get_value().abort(window_id, request_id);
        }
        RuntimeEffect::ScheduleAppTick { window_id, at_ms } => {
            schedule_at(runtime, at_ms, DesktopAction::AppTick { window_id });
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn aborting_a_registered_task_drops_its_result() {
        let tasks = TaskRegistry::default();
        let (handle, registration) = AbortHandle::new_pair();
        tasks.register(WindowId(3), 1, handle);
        assert_eq!(tasks.len(), 1);

        assert!(tasks.abort(WindowId(3), 1));
        let outcome = block_on(Abortable::new(async { "late reply" }, registration));
        assert_eq!(outcome, Err(Aborted));
        assert!(tasks.is_empty());
        assert!(!tasks.abort(WindowId(3), 1));
    }

    #[test]
    fn finished_task_is_forgotten_without_abort() {
        let tasks = TaskRegistry::default();
        let (handle, registration) = AbortHandle::new_pair();
        tasks.register(WindowId(1), 7, handle);
        let outcome = block_on(Abortable::new(async { 42 }, registration));
        tasks.finish(WindowId(1), 7);
        assert_eq!(outcome, Ok(42));
        assert!(tasks.is_empty());
    }

    #[test]
    fn registering_same_key_aborts_the_previous_task() {
        let tasks = TaskRegistry::default();
        let (first, first_registration) = AbortHandle::new_pair();
        let (second, _second_registration) = AbortHandle::new_pair();
        tasks.register(WindowId(2), 1, first);
        tasks.register(WindowId(2), 1, second);
        assert_eq!(
            block_on(Abortable::new(async {}, first_registration)),
            Err(Aborted)
        );
        assert_eq!(tasks.len(), 1);
    }
}
