//! Desktop layout and theme persistence through the host [`PrefsStore`].

use platform_host::{load_pref_with, save_pref_with, PrefsStore};

use crate::model::{DesktopSnapshot, DesktopState, DesktopTheme};

pub const LAYOUT_KEY: &str = "focusdeck.desktop.layout.v1";
pub const THEME_KEY: &str = "focusdeck.desktop.theme.v1";

/// Loads the persisted layout snapshot. Missing or corrupt data yields `None`.
pub async fn load_boot_snapshot(store: &dyn PrefsStore) -> Option<DesktopSnapshot> {
    match load_pref_with::<_, DesktopSnapshot>(store, LAYOUT_KEY).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            leptos::logging::warn!("layout snapshot load failed: {err}");
            None
        }
    }
}

/// Loads the theme override saved by the taskbar toggle.
pub async fn load_theme(store: &dyn PrefsStore) -> Option<DesktopTheme> {
    match load_pref_with::<_, DesktopTheme>(store, THEME_KEY).await {
        Ok(theme) => theme,
        Err(err) => {
            leptos::logging::warn!("theme load failed: {err}");
            None
        }
    }
}

/// Persists the window layout and preferences.
///
/// # Errors
///
/// Returns the store or serialization error.
pub async fn persist_layout_snapshot(
    store: &dyn PrefsStore,
    state: &DesktopState,
) -> Result<(), String> {
    save_pref_with(store, LAYOUT_KEY, &state.snapshot()).await
}

/// Persists the theme.
///
/// # Errors
///
/// Returns the store or serialization error.
pub async fn persist_theme(store: &dyn PrefsStore, theme: &DesktopTheme) -> Result<(), String> {
    save_pref_with(store, THEME_KEY, theme).await
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ApplicationId;
    use futures::executor::block_on;
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reducer::{reduce_desktop, DesktopAction};

    #[test]
    fn layout_round_trips_through_prefs() {
        let store = MemoryPrefsStore::default();
        let mut state = DesktopState::default();
        reduce_desktop(
            &mut state,
            &mut Default::default(),
            DesktopAction::Launch {
                app_id: ApplicationId::trusted("notes"),
                viewport: None,
            },
            0,
        )
        .expect("launch");

        block_on(persist_layout_snapshot(&store, &state)).expect("persist");
        let snapshot = block_on(load_boot_snapshot(&store)).expect("snapshot");
        assert_eq!(snapshot, state.snapshot());
        assert_eq!(snapshot.windows[0].app_id.as_str(), "notes");
    }

    #[test]
    fn corrupt_or_missing_prefs_load_as_none() {
        let store = MemoryPrefsStore::default();
        assert_eq!(block_on(load_boot_snapshot(&store)), None);
        block_on(store.save_pref(LAYOUT_KEY, "{not json")).expect("raw save");
        assert_eq!(block_on(load_boot_snapshot(&store)), None);
    }

    #[test]
    fn theme_is_stored_under_its_own_key() {
        let store = MemoryPrefsStore::default();
        let theme = DesktopTheme { dark_mode: true };
        block_on(persist_theme(&store, &theme)).expect("persist");
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some(r#"{"dark_mode":true}"#));
        assert_eq!(block_on(load_theme(&store)), Some(theme));
    }
}
