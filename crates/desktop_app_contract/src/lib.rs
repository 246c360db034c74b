//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! Apps never reach into runtime internals. They receive their state slice and an action
//! callback from the runtime, and they describe remote data through [`ListState`] so every
//! app degrades the same way when a backing service is unavailable.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use leptos::{Callable, Callback, Signal};
use serde::{Deserialize, Serialize};

/// Stable identifier for a runtime-managed window instance.
///
/// Runtime ids are allocated monotonically and never reused, so they double as the instance
/// generation when guarding late async completions.
pub type WindowRuntimeId = u64;

/// Stable identifier for a registered application (for example `email` or `jarvis`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` is a lowercase kebab-case slug.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected a lowercase kebab-case slug"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for build-time catalog constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns whether `raw` is usable as an app id and therefore as a DOM id suffix.
pub fn is_valid_application_id(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let Some(first) = bytes.first() else {
        return false;
    };
    if bytes.len() > 32 || !first.is_ascii_lowercase() || raw.ends_with('-') {
        return false;
    }
    if raw.contains("--") {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events emitted by the window manager for a hosted app.
pub enum AppLifecycleEvent {
    /// App state has been created for a new window.
    Mounted,
    /// Window became the topmost open window.
    Focused,
    /// Window was minimized.
    Minimized,
    /// Window was restored from the minimized state.
    Restored,
    /// Window was closed and its app state dropped.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Focused => "focused",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Closed => "closed",
        }
    }
}

/// Remote list data as seen by an app: loading, usable, or usable-but-stale.
///
/// A failed fetch never empties a list that already had data. It keeps the last known good
/// items and records a notice instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListState<T> {
    /// First fetch has not completed.
    Loading,
    /// Latest fetch succeeded.
    Ready(Vec<T>),
    /// Latest fetch failed; `items` holds the last known good data (possibly empty).
    Degraded {
        /// Last known good items.
        items: Vec<T>,
        /// User-facing, non-blocking explanation.
        notice: String,
    },
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T: Clone> ListState<T> {
    /// Returns the currently displayable items.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loading => &[],
            Self::Ready(items) | Self::Degraded { items, .. } => items,
        }
    }

    /// Mutable access to the displayable items; `None` while loading.
    pub fn items_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            Self::Loading => None,
            Self::Ready(items) | Self::Degraded { items, .. } => Some(items),
        }
    }

    /// Mutable access that first turns `Loading` into an empty `Ready` list.
    ///
    /// Used for local inserts (for example an optimistic send) into a list that was never
    /// fetched.
    pub fn ensure_items_mut(&mut self) -> &mut Vec<T> {
        match self {
            Self::Ready(items) | Self::Degraded { items, .. } => items,
            Self::Loading => {
                *self = Self::Ready(Vec::new());
                self.ensure_items_mut()
            }
        }
    }

    /// Returns the degradation notice, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Degraded { notice, .. } => Some(notice),
            _ => None,
        }
    }

    /// Returns whether the first fetch is still outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Applies a fetch result, keeping last known good items on failure.
    pub fn apply_result(&mut self, result: Result<Vec<T>, String>, what: &str) {
        *self = match result {
            Ok(items) => Self::Ready(items),
            Err(reason) => Self::Degraded {
                items: self.items().to_vec(),
                notice: format!("{what} unavailable: {reason}"),
            },
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Manifest-backed registration metadata for a runtime app entry.
pub struct AppRegistration {
    /// Canonical app id.
    pub app_id: ApplicationId,
    /// Human-readable display name used for window titles and launcher rows.
    pub display_name: String,
    /// Short icon glyph rendered in the taskbar and start menu.
    pub icon: String,
    /// Whether a second launch focuses the existing window instead of opening another.
    pub single_instance: bool,
    /// Launcher visibility flag.
    pub show_in_launcher: bool,
}

/// Per-window view context handed to an app component by the desktop runtime.
///
/// `S` is the app's headless state slice and `A` its action type. The runtime owns the state;
/// apps only read it and dispatch actions back.
pub struct AppViewContext<S: 'static, A: 'static> {
    /// Stable runtime window id.
    pub window_id: WindowRuntimeId,
    /// Reactive read access to the app state owned by the runtime.
    pub state: Signal<S>,
    /// Lifecycle signal for the hosting window.
    pub lifecycle: Signal<AppLifecycleEvent>,
    dispatch: Callback<A>,
}

impl<S: 'static, A: 'static> Clone for AppViewContext<S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static, A: 'static> Copy for AppViewContext<S, A> {}

impl<S: 'static, A: 'static> AppViewContext<S, A> {
    /// Creates a view context from runtime-owned signals.
    pub fn new(
        window_id: WindowRuntimeId,
        state: Signal<S>,
        lifecycle: Signal<AppLifecycleEvent>,
        dispatch: Callback<A>,
    ) -> Self {
        Self {
            window_id,
            state,
            lifecycle,
            dispatch,
        }
    }

    /// Sends an app action to the runtime reducer.
    pub fn dispatch(&self, action: A) {
        self.dispatch.call(action);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn application_id_requires_kebab_slug() {
        assert!(ApplicationId::new("email").is_ok());
        assert!(ApplicationId::new("account-settings").is_ok());
        assert!(ApplicationId::new("Email").is_err());
        assert!(ApplicationId::new("focus.email").is_err());
        assert!(ApplicationId::new("email-").is_err());
        assert!(ApplicationId::new("").is_err());
        assert!(ApplicationId::new("a--b").is_err());
    }

    #[test]
    fn failed_refresh_keeps_last_known_good_items() {
        let mut list = ListState::Loading;
        list.apply_result(Ok(vec![1, 2]), "Notes");
        list.apply_result(Err("timeout".to_string()), "Notes");

        assert_eq!(list.items(), &[1, 2]);
        assert_eq!(list.notice(), Some("Notes unavailable: timeout"));
    }

    #[test]
    fn local_insert_into_unfetched_list_makes_it_ready() {
        let mut list = ListState::Loading;
        list.ensure_items_mut().push("draft");
        assert_eq!(list, ListState::Ready(vec!["draft"]));
    }

    #[test]
    fn local_insert_keeps_a_degraded_notice() {
        let mut list = ListState::Loading;
        list.apply_result(Err("offline".to_string()), "Sent folder");
        list.ensure_items_mut().insert(0, "draft");

        assert_eq!(list.items(), &["draft"]);
        assert_eq!(list.notice(), Some("Sent folder unavailable: offline"));
    }

    #[test]
    fn failed_first_load_degrades_to_empty() {
        let mut list: ListState<u8> = ListState::default();
        assert!(list.is_loading());
        list.apply_result(Err("502".to_string()), "Decks");
        assert!(list.items().is_empty());
        assert!(!list.is_loading());
    }
}
