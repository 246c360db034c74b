//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::{AppLifecycleEvent, ApplicationId};
use platform_host::{AssistantPrompt, ConsentRecord, EmailId, MailFolder, OutgoingEmail};

use crate::{
    app_runtime::{AppAction, AppOutcome, AppSession, WindowSession},
    apps::{self, CatalogEntry},
    error::ShellError,
    model::{
        DesktopSnapshot, DesktopState, DesktopTheme, DragSession, InteractionState, NoticeLevel,
        PendingPlacement, PointerPosition, ResizeEdge, ResizeSession, SplitPair, SplitPlacement,
        WindowId, WindowRecord, WindowRect, WindowVisibility, DESKTOP_LAYOUT_SCHEMA_VERSION,
    },
    window_manager::{
        maximize_window, normalize_window_stack, raise_window, resize_rect,
        snap_window_to_viewport_edge, tile_split_pair, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open `app_id`, or bring its existing single-instance window to the front.
    Launch {
        /// App to launch.
        app_id: ApplicationId,
        /// Desktop area the new window must fit into.
        viewport: Option<WindowRect>,
    },
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Raise a window without changing its visibility.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window. Unknown ids are ignored.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Restore a minimized window and raise it.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Taskbar click: restore when minimized, otherwise minimize.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Tile two windows side by side across `viewport`.
    SnapPair {
        /// Window for the left half.
        left: WindowId,
        /// Window for the right half.
        right: WindowId,
        /// Desktop area the pair splits.
        viewport: WindowRect,
    },
    /// Open the launch held back by a split at the chosen spot.
    ConfirmPlacement {
        /// Chosen spot.
        placement: SplitPlacement,
    },
    /// Drop the launch held back by a split.
    CancelPlacement,
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Settle a finished start-menu transition.
    StartMenuTick,
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// End the active window drag and apply viewport-edge snapping.
    EndMoveWithViewport {
        /// Current desktop viewport rectangle.
        viewport: WindowRect,
    },
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Flip the dark-mode theme.
    ToggleDarkMode,
    /// Hydrate layout and preferences from a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: DesktopSnapshot,
    },
    /// Apply a persisted theme.
    HydrateTheme {
        /// Theme to apply.
        theme: DesktopTheme,
    },
    /// Boot hydration finished; start loading shell-level data.
    BootHydrationComplete,
    /// The consent service answered.
    ConsentLoaded {
        /// Consent records or failure reason.
        result: Result<Vec<ConsentRecord>, String>,
    },
    /// Show a non-blocking notice.
    RaiseNotice {
        /// Severity.
        level: NoticeLevel,
        /// Message text.
        text: String,
    },
    /// Remove a notice.
    DismissNotice {
        /// Notice id.
        id: u64,
    },
    /// Deliver an action to the app hosted in a window.
    App {
        /// Target window.
        window_id: WindowId,
        /// App-specific action.
        action: AppAction,
    },
    /// Deliver a scheduled timer tick to the app hosted in a window.
    AppTick {
        /// Target window.
        window_id: WindowId,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Persist the current desktop layout snapshot.
    PersistLayout,
    /// Persist theme changes.
    PersistTheme,
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// Dispatch [`DesktopAction::StartMenuTick`] at `at_ms`.
    ScheduleStartMenuTick {
        /// Absolute time.
        at_ms: u64,
    },
    /// Load privacy consent records.
    LoadConsent,
    /// List notes for a notes window.
    LoadNotes {
        /// Requesting window.
        window_id: WindowId,
    },
    /// List decks for a flashcards window.
    LoadDecks {
        /// Requesting window.
        window_id: WindowId,
    },
    /// List one mailbox folder for an email window.
    LoadMailFolder {
        /// Requesting window.
        window_id: WindowId,
        /// Folder to list.
        folder: MailFolder,
    },
    /// Submit an outgoing email.
    SendEmail {
        /// Requesting window.
        window_id: WindowId,
        /// Provisional id the message is shown under.
        local_id: EmailId,
        /// Message to send.
        email: OutgoingEmail,
    },
    /// Ask the assistant collaborator for a reply.
    RequestAssistantReply {
        /// Requesting window.
        window_id: WindowId,
        /// Request id echoed back with the reply.
        request_id: u64,
        /// Prompt to answer.
        prompt: AssistantPrompt,
    },
    /// Abort an in-flight assistant reply.
    CancelAssistantReply {
        /// Requesting window.
        window_id: WindowId,
        /// Request id to abort.
        request_id: u64,
    },
    /// Dispatch [`DesktopAction::AppTick`] for `window_id` at `at_ms`.
    ScheduleAppTick {
        /// Target window.
        window_id: WindowId,
        /// Absolute time.
        at_ms: u64,
    },
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for window management, the start
/// menu and hosted app sessions. `now_ms` is the only clock it reads.
///
/// # Errors
///
/// Returns [`ShellError::UnknownApp`] for launches outside the catalog,
/// [`ShellError::WindowNotFound`] for window commands on missing windows,
/// [`ShellError::Validation`] for a window paired with itself, and
/// [`ShellError::StaleAppEvent`] for app actions addressed to a closed window. The state is left
/// untouched by the caller when an error is returned.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
    now_ms: u64,
) -> Result<Vec<RuntimeEffect>, ShellError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::Launch { app_id, viewport } => {
            let entry = apps::resolve(app_id.as_str())?;
            let existing = entry
                .single_instance
                .then(|| state.window_for_app(&app_id).map(|w| w.id))
                .flatten();

            let window_id = match existing {
                Some(window_id) => {
                    let was_minimized = state.window(window_id).is_some_and(WindowRecord::is_minimized);
                    raise_window(state, window_id, true);
                    if was_minimized {
                        set_session_visible(state, window_id, true);
                        set_lifecycle(state, window_id, AppLifecycleEvent::Restored);
                    } else {
                        set_lifecycle(state, window_id, AppLifecycleEvent::Focused);
                    }
                    window_id
                }
                None if state.split.is_some() => {
                    // Ask where the window goes before opening it.
                    state.pending_placement = Some(PendingPlacement { app_id, viewport });
                    close_start_menu(state, &mut effects, now_ms);
                    return Ok(effects);
                }
                None => open_window(state, &mut effects, entry, app_id, viewport)?,
            };
            close_start_menu(state, &mut effects, now_ms);
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let index = state
                .windows
                .iter()
                .position(|w| w.id == window_id)
                .ok_or(ShellError::WindowNotFound(window_id))?;
            state.windows.remove(index);
            if let Some(mut session) = state.sessions.remove(&window_id) {
                effects.extend(session.app.release(window_id));
            }
            if let Some(pair) = state.split {
                if let Some(partner) = pair.partner(window_id) {
                    state.split = None;
                    if maximize_window(state, partner, pair.viewport) {
                        set_session_visible(state, partner, true);
                        set_lifecycle(state, partner, AppLifecycleEvent::Focused);
                        effects.push(RuntimeEffect::FocusWindowInput(partner));
                    }
                }
            }
            if interaction
                .dragging
                .as_ref()
                .is_some_and(|drag| drag.window_id == window_id)
            {
                interaction.dragging = None;
            }
            if interaction
                .resizing
                .as_ref()
                .is_some_and(|resize| resize.window_id == window_id)
            {
                interaction.resizing = None;
            }
            normalize_window_stack(state);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::FocusWindow { window_id } => {
            if !raise_window(state, window_id, false) {
                return Err(ShellError::WindowNotFound(window_id));
            }
            close_start_menu(state, &mut effects, now_ms);
            if state.focused_window_id() == Some(window_id) {
                set_lifecycle(state, window_id, AppLifecycleEvent::Focused);
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
                return Ok(effects);
            };
            if !window.is_minimized() {
                window.visibility = WindowVisibility::Minimized;
                window.is_focused = false;
                set_session_visible(state, window_id, false);
                set_lifecycle(state, window_id, AppLifecycleEvent::Minimized);
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = state
                .window(window_id)
                .ok_or(ShellError::WindowNotFound(window_id))?;
            if window.is_minimized() {
                restore_window(state, &mut effects, window_id);
            }
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let window = state
                .window(window_id)
                .ok_or(ShellError::WindowNotFound(window_id))?;
            if window.is_minimized() {
                restore_window(state, &mut effects, window_id);
            } else {
                return reduce_desktop(
                    state,
                    interaction,
                    DesktopAction::MinimizeWindow { window_id },
                    now_ms,
                );
            }
        }
        DesktopAction::SnapPair {
            left,
            right,
            viewport,
        } => {
            if left == right {
                return Err(ShellError::Validation(format!(
                    "window {left} cannot be paired with itself"
                )));
            }
            for window_id in [left, right] {
                if state.window(window_id).is_none() {
                    return Err(ShellError::WindowNotFound(window_id));
                }
            }
            let pair = SplitPair {
                left,
                right,
                viewport,
            };
            tile_split_pair(state, pair);
            for window_id in [right, left] {
                set_session_visible(state, window_id, true);
            }
            set_lifecycle(state, left, AppLifecycleEvent::Focused);
            close_start_menu(state, &mut effects, now_ms);
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(left));
        }
        DesktopAction::ConfirmPlacement { placement } => {
            let Some(PendingPlacement { app_id, viewport }) = state.pending_placement.take() else {
                return Ok(effects);
            };
            let entry = apps::resolve(app_id.as_str())?;
            let window_id = open_window(state, &mut effects, entry, app_id, viewport)?;
            let replacement = match (state.split, placement) {
                (Some(pair), SplitPlacement::Left) => Some(SplitPair {
                    left: window_id,
                    ..pair
                }),
                (Some(pair), SplitPlacement::Right) => Some(SplitPair {
                    right: window_id,
                    ..pair
                }),
                (_, SplitPlacement::Over) | (None, _) => None,
            };
            if let Some(pair) = replacement {
                tile_split_pair(state, pair);
            }
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CancelPlacement => state.pending_placement = None,
        DesktopAction::ToggleStartMenu => {
            let transition_ms = state.preferences.timeouts.start_menu_transition_ms;
            if let Some(at_ms) = state.start_menu.toggle(now_ms, transition_ms) {
                effects.push(RuntimeEffect::ScheduleStartMenuTick { at_ms });
            }
        }
        DesktopAction::CloseStartMenu => close_start_menu(state, &mut effects, now_ms),
        DesktopAction::StartMenuTick => {
            if !state.start_menu.tick(now_ms) {
                // Early timer: keep a tick pending until the transition settles.
                if let Some(at_ms) = state.start_menu.settle_at_ms() {
                    effects.push(RuntimeEffect::ScheduleStartMenuTick { at_ms });
                }
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            leave_split(state, window_id);
            raise_window(state, window_id, false);
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, session.window_id)?;
                window.rect = session.rect_start.offset(dx, dy);
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::EndMoveWithViewport { viewport } => {
            let dragged_window_id = interaction
                .dragging
                .as_ref()
                .map(|session| session.window_id);
            interaction.dragging = None;

            if let Some(window_id) = dragged_window_id {
                snap_window_to_viewport_edge(state, window_id, viewport);
            }

            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            leave_split(state, window_id);
            raise_window(state, window_id, false);
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, session.window_id)?;
                window.rect = resize_rect(session.rect_start, session.edge, dx, dy)
                    .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleDarkMode => {
            state.theme.dark_mode = !state.theme.dark_mode;
            effects.push(RuntimeEffect::PersistTheme);
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            hydrate_snapshot(state, &mut effects, snapshot);
        }
        DesktopAction::HydrateTheme { theme } => {
            state.theme = theme;
        }
        DesktopAction::BootHydrationComplete => {
            if !state.booted {
                state.booted = true;
                effects.push(RuntimeEffect::LoadConsent);
            }
        }
        DesktopAction::ConsentLoaded { result } => {
            if let Err(reason) = &result {
                state.push_notice(
                    NoticeLevel::Warning,
                    ShellError::service_unavailable("Privacy consent", reason.clone()).to_string(),
                );
            }
            state.consent.apply_result(result, "Privacy consent");
        }
        DesktopAction::RaiseNotice { level, text } => state.push_notice(level, text),
        DesktopAction::DismissNotice { id } => state.notices.retain(|notice| notice.id != id),
        DesktopAction::App { window_id, action } => {
            let session = state
                .sessions
                .get_mut(&window_id)
                .ok_or(ShellError::StaleAppEvent(window_id))?;
            match session.app.apply(window_id, action, now_ms) {
                Ok(outcome) => absorb_outcome(state, &mut effects, outcome),
                Err(ShellError::Validation(reason)) => {
                    leptos::logging::debug_warn!("window {window_id}: {reason}");
                }
                Err(err) => return Err(err),
            }
        }
        DesktopAction::AppTick { window_id } => {
            let session = state
                .sessions
                .get_mut(&window_id)
                .ok_or(ShellError::StaleAppEvent(window_id))?;
            let outcome = session.app.tick(window_id, now_ms);
            absorb_outcome(state, &mut effects, outcome);
        }
    }

    normalize_window_stack(state);
    Ok(effects)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

/// Creates a window for `app_id`, mounts its session and raises it.
fn open_window(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    entry: &CatalogEntry,
    app_id: ApplicationId,
    viewport: Option<WindowRect>,
) -> Result<WindowId, ShellError> {
    let mut session = AppSession::new(&app_id, &state.preferences)?;
    let window_id = next_window_id(state);
    let rect = match viewport {
        Some(viewport) => fit_rect_to_viewport(entry.default_rect, viewport),
        None => entry.default_rect,
    }
    .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    state.windows.push(WindowRecord {
        id: window_id,
        app_id,
        title: entry.display_name.to_string(),
        icon: entry.icon.to_string(),
        rect,
        restore_rect: None,
        z_index: 0,
        is_focused: false,
        visibility: WindowVisibility::Open,
    });
    let outcome = session.mount(window_id);
    state.sessions.insert(
        window_id,
        WindowSession {
            app: session,
            lifecycle: AppLifecycleEvent::Mounted,
        },
    );
    raise_window(state, window_id, true);
    absorb_outcome(state, effects, outcome);
    Ok(window_id)
}

/// Dissolves the split when the user starts moving or resizing one of its halves.
fn leave_split(state: &mut DesktopState, window_id: WindowId) {
    if state.split.is_some_and(|pair| pair.contains(window_id)) {
        state.split = None;
    }
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ShellError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ShellError::WindowNotFound(window_id))
}

fn set_lifecycle(state: &mut DesktopState, window_id: WindowId, event: AppLifecycleEvent) {
    if let Some(session) = state.sessions.get_mut(&window_id) {
        session.lifecycle = event;
    }
}

fn set_session_visible(state: &mut DesktopState, window_id: WindowId, visible: bool) {
    if let Some(session) = state.sessions.get_mut(&window_id) {
        session.app.set_visible(visible);
    }
}

fn restore_window(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>, window_id: WindowId) {
    raise_window(state, window_id, true);
    set_session_visible(state, window_id, true);
    set_lifecycle(state, window_id, AppLifecycleEvent::Restored);
    effects.push(RuntimeEffect::PersistLayout);
    effects.push(RuntimeEffect::FocusWindowInput(window_id));
}

fn close_start_menu(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>, now_ms: u64) {
    let transition_ms = state.preferences.timeouts.start_menu_transition_ms;
    if let Some(at_ms) = state.start_menu.close(now_ms, transition_ms) {
        effects.push(RuntimeEffect::ScheduleStartMenuTick { at_ms });
    }
}

fn absorb_outcome(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>, outcome: AppOutcome) {
    effects.extend(outcome.effects);
    for (level, text) in outcome.notices {
        state.push_notice(level, text);
    }
}

/// Keeps the default size when it fits and pulls the window back inside `viewport`.
fn fit_rect_to_viewport(rect: WindowRect, viewport: WindowRect) -> WindowRect {
    let w = rect.w.min(viewport.w);
    let h = rect.h.min(viewport.h);
    WindowRect {
        x: rect.x.clamp(viewport.x, (viewport.x + viewport.w - w).max(viewport.x)),
        y: rect.y.clamp(viewport.y, (viewport.y + viewport.h - h).max(viewport.y)),
        w,
        h,
    }
}

fn hydrate_snapshot(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    snapshot: DesktopSnapshot,
) {
    if snapshot.schema_version != DESKTOP_LAYOUT_SCHEMA_VERSION {
        leptos::logging::warn!(
            "ignoring layout snapshot with schema {}",
            snapshot.schema_version
        );
        return;
    }
    state.theme = snapshot.theme;
    state.preferences = snapshot.preferences;
    if !state.preferences.restore_on_boot || !state.windows.is_empty() {
        return;
    }

    let mut restored: Vec<WindowRecord> = Vec::new();
    let mut ordered = snapshot.windows;
    ordered.sort_by_key(|w| w.z_index);
    for record in ordered {
        let known = apps::resolve(record.app_id.as_str()).is_ok();
        if known && !restored.iter().any(|w| w.app_id == record.app_id) {
            restored.push(record);
        }
    }
    let max_restore = state.preferences.max_restore_windows;
    if restored.len() > max_restore {
        restored.drain(0..restored.len() - max_restore);
    }

    for record in &mut restored {
        let Ok(mut session) = AppSession::new(&record.app_id, &state.preferences) else {
            continue;
        };
        let outcome = session.mount(record.id);
        if record.is_minimized() {
            session.set_visible(false);
        }
        record.is_focused = false;
        state.sessions.insert(
            record.id,
            WindowSession {
                app: session,
                lifecycle: AppLifecycleEvent::Mounted,
            },
        );
        absorb_outcome(state, effects, outcome);
    }

    let max_id = restored.iter().map(|w| w.id.0).max().unwrap_or(0);
    state.next_window_id = state.next_window_id.max(max_id.saturating_add(1));
    state.windows = restored;
    normalize_window_stack(state);
}
