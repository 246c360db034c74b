use std::collections::BTreeMap;

use desktop_app_contract::{ApplicationId, ListState};
use platform_host::ConsentRecord;
use serde::{Deserialize, Serialize};

use crate::{app_runtime::WindowSession, start_menu::StartMenuPhase};

pub const DESKTOP_LAYOUT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_WIDTH: i32 = 640;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 440;
/// Oldest notices are dropped beyond this count.
pub const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 48,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Whether a live window is shown. Closing removes the window instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowVisibility {
    #[default]
    Open,
    Minimized,
}

impl WindowVisibility {
    /// Stable token for `data-state`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Minimized => "minimized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub icon: String,
    pub rect: WindowRect,
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    pub is_focused: bool,
    pub visibility: WindowVisibility,
}

impl WindowRecord {
    pub fn is_minimized(&self) -> bool {
        self.visibility == WindowVisibility::Minimized
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopTheme {
    pub dark_mode: bool,
}

/// Bounds on every asynchronous boundary the shell waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellTimeouts {
    pub start_menu_transition_ms: u64,
    pub assistant_reply_ms: u64,
    pub auth_check_ms: u64,
}

impl Default for ShellTimeouts {
    fn default() -> Self {
        Self {
            start_menu_transition_ms: 200,
            assistant_reply_ms: 30_000,
            auth_check_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellPreferences {
    pub restore_on_boot: bool,
    pub max_restore_windows: usize,
    pub timeouts: ShellTimeouts,
}

impl Default for ShellPreferences {
    fn default() -> Self {
        Self {
            restore_on_boot: true,
            max_restore_windows: 5,
            timeouts: ShellTimeouts::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Non-blocking message shown in the notice tray until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellNotice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
}

/// Two windows tiled side by side across `viewport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPair {
    pub left: WindowId,
    pub right: WindowId,
    pub viewport: WindowRect,
}

impl SplitPair {
    pub fn contains(self, window_id: WindowId) -> bool {
        self.left == window_id || self.right == window_id
    }

    /// The other half of the pair, when `window_id` is one of its halves.
    pub fn partner(self, window_id: WindowId) -> Option<WindowId> {
        if window_id == self.left {
            Some(self.right)
        } else if window_id == self.right {
            Some(self.left)
        } else {
            None
        }
    }
}

/// Where a window launched during a split lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitPlacement {
    /// Replace the left half.
    Left,
    /// Replace the right half.
    Right,
    /// Float above the pair.
    Over,
}

/// A launch held back until the user picks a [`SplitPlacement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlacement {
    pub app_id: ApplicationId,
    pub viewport: Option<WindowRect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub windows: Vec<WindowRecord>,
    pub sessions: BTreeMap<WindowId, WindowSession>,
    pub start_menu: StartMenuPhase,
    pub theme: DesktopTheme,
    pub preferences: ShellPreferences,
    pub notices: Vec<ShellNotice>,
    pub next_notice_id: u64,
    pub consent: ListState<ConsentRecord>,
    pub booted: bool,
    pub split: Option<SplitPair>,
    pub pending_placement: Option<PendingPlacement>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
            sessions: BTreeMap::new(),
            start_menu: StartMenuPhase::Closed,
            theme: DesktopTheme::default(),
            preferences: ShellPreferences::default(),
            notices: Vec::new(),
            next_notice_id: 1,
            consent: ListState::Loading,
            booted: false,
            split: None,
            pending_placement: None,
        }
    }
}

impl DesktopState {
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_for_app(&self, app_id: &ApplicationId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.app_id == app_id)
    }

    /// Highest-z window that is not minimized.
    pub fn topmost_open_window(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized())
            .max_by_key(|w| w.z_index)
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(ShellNotice {
            id: self.next_notice_id,
            level,
            text: text.into(),
        });
        self.next_notice_id += 1;
        if self.notices.len() > MAX_NOTICES {
            let overflow = self.notices.len() - MAX_NOTICES;
            self.notices.drain(0..overflow);
        }
    }

    pub fn snapshot(&self) -> DesktopSnapshot {
        DesktopSnapshot {
            schema_version: DESKTOP_LAYOUT_SCHEMA_VERSION,
            theme: self.theme.clone(),
            preferences: self.preferences.clone(),
            windows: self.windows.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSnapshot {
    pub schema_version: u32,
    pub theme: DesktopTheme,
    pub preferences: ShellPreferences,
    pub windows: Vec<WindowRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notices_keep_only_the_newest_five() {
        let mut state = DesktopState::default();
        for n in 0..7 {
            state.push_notice(NoticeLevel::Warning, format!("notice {n}"));
        }
        let texts: Vec<_> = state.notices.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["notice 2", "notice 3", "notice 4", "notice 5", "notice 6"]
        );
        assert_eq!(state.notices[0].id, 3);
    }

    #[test]
    fn split_partner_is_the_other_half() {
        let pair = SplitPair {
            left: WindowId(1),
            right: WindowId(2),
            viewport: WindowRect::default(),
        };
        assert_eq!(pair.partner(WindowId(1)), Some(WindowId(2)));
        assert_eq!(pair.partner(WindowId(2)), Some(WindowId(1)));
        assert_eq!(pair.partner(WindowId(3)), None);
        assert!(!pair.contains(WindowId(3)));
    }

    #[test]
    fn snapshot_preferences_fill_missing_fields() {
        let prefs: ShellPreferences =
            serde_json::from_str(r#"{"restore_on_boot":false}"#).expect("partial prefs");
        assert!(!prefs.restore_on_boot);
        assert_eq!(prefs.max_restore_windows, 5);
        assert_eq!(prefs.timeouts.assistant_reply_ms, 30_000);
    }
}
