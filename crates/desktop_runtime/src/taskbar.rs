//! Taskbar projection of the window set.

use desktop_app_contract::ApplicationId;

use crate::{
    dom::taskbar_button_dom_id,
    model::{DesktopState, WindowId},
};

/// One taskbar button. There is exactly one per open window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon: String,
    /// Rendered with the `taskbar-dimmed` marker while the window is minimized.
    pub dimmed: bool,
    pub focused: bool,
    pub dom_id: String,
}

/// Entries in window creation order, so buttons do not jump around when focus changes.
pub fn taskbar_entries(state: &DesktopState) -> Vec<TaskbarEntry> {
    let mut entries: Vec<TaskbarEntry> = state
        .windows
        .iter()
        .map(|win| TaskbarEntry {
            window_id: win.id,
            app_id: win.app_id.clone(),
            title: win.title.clone(),
            icon: win.icon.clone(),
            dimmed: win.is_minimized(),
            focused: win.is_focused,
            dom_id: taskbar_button_dom_id(&win.app_id),
        })
        .collect();
    entries.sort_by_key(|entry| entry.window_id);
    entries
}

pub fn taskbar_aria_label(entry: &TaskbarEntry) -> String {
    if entry.dimmed {
        format!("{} (minimized)", entry.title)
    } else {
        entry.title.clone()
    }
}

/// Number of data sources the user has allowed, for the tray badge.
pub fn enabled_consent_count(state: &DesktopState) -> usize {
    state
        .consent
        .items()
        .iter()
        .filter(|record| record.is_enabled)
        .count()
}
