//! Shared window-manager transition helpers used by the desktop reducer.

use crate::model::{DesktopState, ResizeEdge, SplitPair, WindowId, WindowRect, WindowVisibility};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;
/// Pointer threshold (in px) for snap-edge behavior.
pub const SNAP_EDGE_THRESHOLD: i32 = 24;

/// Raises `window_id` to the top of the stack, optionally making it visible.
///
/// A window that stays minimized is raised but not focused. Returns `false` when the window is
/// unknown.
pub fn raise_window(state: &mut DesktopState, window_id: WindowId, make_visible: bool) -> bool {
    let Some(index) = state.windows.iter().position(|w| w.id == window_id) else {
        return false;
    };

    let mut window = state.windows.remove(index);
    if make_visible {
        window.visibility = WindowVisibility::Open;
    }
    let focusable = !window.is_minimized();
    if focusable {
        for other in &mut state.windows {
            other.is_focused = false;
        }
    }
    window.is_focused = focusable;
    state.windows.push(window);
    normalize_window_stack(state);
    true
}

/// Normalizes z-index ordering and focus invariants for all managed windows.
///
/// Exactly one non-minimized window is focused whenever any exists: the previously focused one if
/// still eligible, else the topmost open window.
pub fn normalize_window_stack(state: &mut DesktopState) {
    let mut has_focused = false;
    for (idx, window) in state.windows.iter_mut().enumerate() {
        window.z_index = (idx + 1) as u32;
        if window.is_minimized() {
            window.is_focused = false;
        }
        if window.is_focused {
            if has_focused {
                window.is_focused = false;
            } else {
                has_focused = true;
            }
        }
    }

    if !has_focused {
        if let Some(last_open) = state.windows.iter_mut().rev().find(|w| !w.is_minimized()) {
            last_open.is_focused = true;
        }
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

/// Snaps a dragged window to the left or right viewport half when dropped near that edge.
///
/// Returns whether a snap was applied.
pub fn snap_window_to_viewport_edge(
    state: &mut DesktopState,
    window_id: WindowId,
    viewport: WindowRect,
) -> bool {
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };

    if window.is_minimized() {
        return false;
    }

    let near_left = window.rect.x <= viewport.x + SNAP_EDGE_THRESHOLD;
    let near_right = window.rect.x + window.rect.w >= viewport.x + viewport.w - SNAP_EDGE_THRESHOLD;
    if near_left == near_right {
        return false;
    }

    let half_width = (viewport.w / 2).max(MIN_WINDOW_WIDTH);
    let snapped = WindowRect {
        x: if near_right {
            viewport.x + viewport.w - half_width
        } else {
            viewport.x
        },
        y: viewport.y,
        w: half_width,
        h: viewport.h.max(MIN_WINDOW_HEIGHT),
    };

    window.restore_rect = Some(window.rect);
    window.rect = snapped;
    true
}

/// Left and right halves of `viewport`.
pub fn split_halves(viewport: WindowRect) -> (WindowRect, WindowRect) {
    let half_width = (viewport.w / 2).max(MIN_WINDOW_WIDTH);
    let h = viewport.h.max(MIN_WINDOW_HEIGHT);
    let left = WindowRect {
        x: viewport.x,
        y: viewport.y,
        w: half_width,
        h,
    };
    let right = WindowRect {
        x: viewport.x + viewport.w - half_width,
        ..left
    };
    (left, right)
}

/// Tiles `pair` across its viewport and records it as the active split.
///
/// Both windows are shown and the left one ends up focused. Returns `false` without changes when
/// either window is unknown.
pub fn tile_split_pair(state: &mut DesktopState, pair: SplitPair) -> bool {
    if state.window(pair.left).is_none() || state.window(pair.right).is_none() {
        return false;
    }

    let (left_rect, right_rect) = split_halves(pair.viewport);
    for window in &mut state.windows {
        let rect = if window.id == pair.left {
            left_rect
        } else if window.id == pair.right {
            right_rect
        } else {
            continue;
        };
        if window.restore_rect.is_none() {
            window.restore_rect = Some(window.rect);
        }
        window.rect = rect;
    }
    raise_window(state, pair.right, true);
    raise_window(state, pair.left, true);
    state.split = Some(pair);
    true
}

/// Fills `viewport` with `window_id` and brings it to the front.
pub fn maximize_window(state: &mut DesktopState, window_id: WindowId, viewport: WindowRect) -> bool {
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };
    window.rect = viewport.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    raise_window(state, window_id, true)
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ApplicationId;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowRecord;

    fn record(id: u64, visibility: WindowVisibility, rect: WindowRect) -> WindowRecord {
        WindowRecord {
            id: WindowId(id),
            app_id: ApplicationId::trusted("notes"),
            title: format!("Window {id}"),
            icon: String::new(),
            rect,
            restore_rect: None,
            z_index: 0,
            is_focused: false,
            visibility,
        }
    }

    fn rect(x: i32, w: i32) -> WindowRect {
        WindowRect { x, y: 40, w, h: 300 }
    }

    fn focused_ids(state: &DesktopState) -> Vec<u64> {
        state
            .windows
            .iter()
            .filter(|w| w.is_focused)
            .map(|w| w.id.0)
            .collect()
    }

    #[test]
    fn raising_a_minimized_window_leaves_focus_on_the_open_one() {
        let mut state = DesktopState::default();
        state.windows = vec![
            record(1, WindowVisibility::Minimized, rect(0, 300)),
            record(2, WindowVisibility::Open, rect(0, 300)),
        ];
        normalize_window_stack(&mut state);
        assert_eq!(focused_ids(&state), vec![2]);

        assert!(raise_window(&mut state, WindowId(1), false));
        assert_eq!(state.windows.last().map(|w| w.id), Some(WindowId(1)));
        assert_eq!(focused_ids(&state), vec![2]);

        assert!(raise_window(&mut state, WindowId(1), true));
        assert_eq!(focused_ids(&state), vec![1]);
        assert!(!raise_window(&mut state, WindowId(9), true));
    }

    #[test]
    fn stack_order_matches_z_index() {
        let mut state = DesktopState::default();
        state.windows = vec![
            record(4, WindowVisibility::Open, rect(0, 300)),
            record(2, WindowVisibility::Open, rect(0, 300)),
        ];
        normalize_window_stack(&mut state);
        let z: Vec<(u64, u32)> = state.windows.iter().map(|w| (w.id.0, w.z_index)).collect();
        assert_eq!(z, vec![(4, 1), (2, 2)]);
    }

    #[test]
    fn west_resize_moves_origin_with_width() {
        let start = WindowRect { x: 100, y: 100, w: 400, h: 300 };
        assert_eq!(
            resize_rect(start, ResizeEdge::West, 50, 0),
            WindowRect { x: 150, y: 100, w: 350, h: 300 }
        );
        assert_eq!(
            resize_rect(start, ResizeEdge::SouthEast, 10, 20),
            WindowRect { x: 100, y: 100, w: 410, h: 320 }
        );
    }

    #[test]
    fn drop_near_right_edge_snaps_to_right_half() {
        let viewport = WindowRect { x: 0, y: 0, w: 1000, h: 700 };
        let mut state = DesktopState::default();
        state.windows = vec![record(1, WindowVisibility::Open, rect(700, 290))];

        assert!(snap_window_to_viewport_edge(&mut state, WindowId(1), viewport));
        assert_eq!(state.windows[0].rect, WindowRect { x: 500, y: 0, w: 500, h: 700 });
        assert_eq!(state.windows[0].restore_rect, Some(rect(700, 290)));
    }

    #[test]
    fn tiling_a_pair_shows_both_halves_and_focuses_left() {
        let viewport = WindowRect { x: 0, y: 0, w: 1000, h: 700 };
        let mut state = DesktopState::default();
        state.windows = vec![
            record(1, WindowVisibility::Open, rect(0, 300)),
            record(2, WindowVisibility::Minimized, rect(100, 300)),
            record(3, WindowVisibility::Open, rect(200, 300)),
        ];
        let pair = SplitPair {
            left: WindowId(2),
            right: WindowId(1),
            viewport,
        };

        assert!(tile_split_pair(&mut state, pair));
        let left = state.window(WindowId(2)).expect("left");
        assert_eq!(left.rect, WindowRect { x: 0, y: 0, w: 500, h: 700 });
        assert_eq!(left.restore_rect, Some(rect(100, 300)));
        assert!(!left.is_minimized());
        assert_eq!(
            state.window(WindowId(1)).map(|w| w.rect),
            Some(WindowRect { x: 500, y: 0, w: 500, h: 700 })
        );
        assert_eq!(focused_ids(&state), vec![2]);
        assert_eq!(state.split, Some(pair));

        let missing = SplitPair {
            right: WindowId(9),
            ..pair
        };
        state.split = None;
        assert!(!tile_split_pair(&mut state, missing));
        assert_eq!(state.split, None);
    }

    #[test]
    fn window_spanning_both_edges_does_not_snap() {
        let viewport = WindowRect { x: 0, y: 0, w: 1000, h: 700 };
        let mut state = DesktopState::default();
        state.windows = vec![record(1, WindowVisibility::Open, rect(0, 1000))];
        assert!(!snap_window_to_viewport_edge(&mut state, WindowId(1), viewport));
        assert_eq!(state.windows[0].restore_rect, None);
    }
}
