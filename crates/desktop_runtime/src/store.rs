//! Owned desktop store with change subscriptions.
//!
//! The window set, start-menu phase and app sessions live in one [`DesktopStore`]. Views and the
//! taskbar read through it and write only by dispatching [`DesktopAction`] values, so every
//! entity has a single writer. Subscribers are notified after each committed change.

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::ApplicationId;

use crate::{
    error::ShellError,
    model::{DesktopState, InteractionState, WindowId},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

type Listener = Rc<dyn Fn(&DesktopState)>;

#[derive(Default)]
struct StoreInner {
    state: DesktopState,
    interaction: InteractionState,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

/// Single owner of desktop state. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct DesktopStore {
    inner: Rc<RefCell<StoreInner>>,
}

/// Handle returned by [`DesktopStore::subscribe`].
#[must_use]
pub struct Subscription {
    id: u64,
    store: DesktopStore,
}

impl Subscription {
    /// Removes the listener.
    pub fn unsubscribe(self) {
        self.store
            .inner
            .borrow_mut()
            .listeners
            .retain(|(id, _)| *id != self.id);
    }
}

impl DesktopStore {
    /// Creates a store seeded with `state` and no subscribers.
    pub fn new(state: DesktopState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state,
                ..StoreInner::default()
            })),
        }
    }

    /// Clone of the current state.
    pub fn state(&self) -> DesktopState {
        self.inner.borrow().state.clone()
    }

    /// Runs `f` against the current state without cloning it.
    ///
    /// `f` must not dispatch into this store; the state stays borrowed while it runs.
    pub fn with_state<R>(&self, f: impl FnOnce(&DesktopState) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Current drag/resize session, if any.
    pub fn interaction(&self) -> InteractionState {
        self.inner.borrow().interaction.clone()
    }

    /// Reduces `action` against a copy of the state and commits only on success.
    ///
    /// # Errors
    ///
    /// Propagates the reducer error. The stored state is unchanged in that case.
    pub fn dispatch(
        &self,
        action: DesktopAction,
        now_ms: u64,
    ) -> Result<Vec<RuntimeEffect>, ShellError> {
        let (effects, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let mut state = inner.state.clone();
            let mut interaction = inner.interaction.clone();
            let effects = reduce_desktop(&mut state, &mut interaction, action, now_ms)?;
            let changed = state != inner.state;
            inner.state = state;
            inner.interaction = interaction;
            let listeners: Vec<Listener> = if changed {
                inner.listeners.iter().map(|(_, f)| Rc::clone(f)).collect()
            } else {
                Vec::new()
            };
            (effects, listeners)
        };

        if !listeners.is_empty() {
            let snapshot = self.state();
            for listener in listeners {
                listener(&snapshot);
            }
        }
        Ok(effects)
    }

    /// Launches `app_id` and returns the id of its window.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::UnknownApp`] for ids outside the catalog.
    pub fn launch(
        &self,
        app_id: ApplicationId,
        now_ms: u64,
    ) -> Result<(WindowId, Vec<RuntimeEffect>), ShellError> {
        let effects = self.dispatch(
            DesktopAction::Launch {
                app_id: app_id.clone(),
                viewport: None,
            },
            now_ms,
        )?;
        let window_id = self
            .with_state(|state| state.window_for_app(&app_id).map(|w| w.id))
            .ok_or_else(|| ShellError::UnknownApp(app_id.to_string()))?;
        Ok((window_id, effects))
    }

    /// Registers `listener` for every committed state change.
    pub fn subscribe(&self, listener: impl Fn(&DesktopState) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        Subscription {
            id,
            store: self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use desktop_app_email::EmailAction;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{app_runtime::AppAction, apps, taskbar::taskbar_entries};

    fn app(id: &str) -> ApplicationId {
        ApplicationId::trusted(id)
    }

    #[test]
    fn launch_returns_existing_window_for_single_instance_apps() {
        let store = DesktopStore::default();
        let (first, _) = store.launch(app("email"), 0).expect("launch");
        let (second, _) = store.launch(app("email"), 1).expect("relaunch");
        assert_eq!(first, second);
        assert_eq!(store.with_state(|s| s.windows.len()), 1);
    }

    #[test]
    fn failed_dispatch_leaves_state_untouched() {
        let store = DesktopStore::default();
        store.launch(app("notes"), 0).expect("launch");
        let before = store.state();
        let err = store
            .dispatch(
                DesktopAction::CloseWindow {
                    window_id: WindowId(77),
                },
                5,
            )
            .expect_err("unknown window");
        assert_eq!(err, ShellError::WindowNotFound(WindowId(77)));
        assert_eq!(store.state(), before);
    }

    #[test]
    fn taskbar_tracks_window_set_through_launch_and_close() {
        let store = DesktopStore::default();
        let mut ids = Vec::new();
        for entry in apps::app_registry() {
            let (id, _) = store.launch(entry.application_id(), 0).expect("launch");
            ids.push(id);
            store.with_state(|s| assert_eq!(taskbar_entries(s).len(), s.windows.len()));
        }
        for id in ids {
            store
                .dispatch(DesktopAction::CloseWindow { window_id: id }, 0)
                .expect("close");
            store.with_state(|s| assert_eq!(taskbar_entries(s).len(), s.windows.len()));
        }
    }

    #[test]
    fn minimize_restore_round_trip_clears_dimmed_entry() {
        let store = DesktopStore::default();
        let (id, _) = store.launch(app("flashcards"), 0).expect("launch");
        store
            .dispatch(DesktopAction::MinimizeWindow { window_id: id }, 1)
            .expect("minimize");
        store.with_state(|s| assert!(taskbar_entries(s)[0].dimmed));
        store
            .dispatch(DesktopAction::RestoreWindow { window_id: id }, 2)
            .expect("restore");
        store.with_state(|s| {
            assert!(!s.windows[0].is_minimized());
            assert!(!taskbar_entries(s)[0].dimmed);
        });
    }

    #[test]
    fn app_actions_route_to_the_window_session() {
        let store = DesktopStore::default();
        let (id, _) = store.launch(app("email"), 0).expect("launch");
        store
            .dispatch(
                DesktopAction::App {
                    window_id: id,
                    action: AppAction::Email(EmailAction::OpenCompose),
                },
                1,
            )
            .expect("compose");
        store.with_state(|s| {
            let email = s.sessions[&id].app.as_email().expect("email");
            assert!(email.compose.is_some());
        });
    }

    #[test]
    fn subscribers_hear_changes_until_unsubscribed() {
        let store = DesktopStore::default();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let subscription = store.subscribe(move |state| {
            assert!(!state.windows.is_empty());
            seen.set(seen.get() + 1);
        });

        store.launch(app("notes"), 0).expect("launch");
        assert_eq!(calls.get(), 1);

        store
            .dispatch(DesktopAction::CloseStartMenu, 1)
            .expect("no-op");
        assert_eq!(calls.get(), 1);

        subscription.unsubscribe();
        store.launch(app("jarvis"), 2).expect("launch");
        assert_eq!(calls.get(), 1);
    }
}
