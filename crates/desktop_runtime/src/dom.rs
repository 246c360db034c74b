//! Addressable DOM contract and browser-only helpers.
//!
//! Element ids and marker classes here are relied on by automated browser checks, so they are
//! derived from app ids and state enums rather than chosen ad hoc in views.

use desktop_app_contract::ApplicationId;

use crate::model::WindowRect;

/// Id of the start-menu panel.
pub const START_MENU_DOM_ID: &str = "start-menu";
/// Class carried by a minimized window.
pub const MINIMIZED_CLASS: &str = "minimized";
/// Class carried by the taskbar button of a minimized window.
pub const TASKBAR_DIMMED_CLASS: &str = "taskbar-dimmed";
/// Class carried by the start menu once its open transition has settled.
pub const START_MENU_READY_CLASS: &str = "start-menu-ready";
/// Id of the prompt asking where a launch lands during a split.
pub const PLACEMENT_PROMPT_DOM_ID: &str = "placement-modal";
/// Height reserved for the taskbar at the bottom of the viewport.
pub const TASKBAR_HEIGHT_PX: i32 = 44;

pub fn window_dom_id(app_id: &ApplicationId) -> String {
    format!("win-{app_id}")
}

pub fn taskbar_button_dom_id(app_id: &ApplicationId) -> String {
    format!("task-{app_id}")
}

/// Element that receives keyboard focus when a window is raised.
pub fn window_primary_input_selector(app_id: &ApplicationId) -> String {
    format!("#{} [data-autofocus]", window_dom_id(app_id))
}

#[cfg(target_arch = "wasm32")]
pub fn focus_first_match(selector: &str) -> bool {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return false;
    };
    let Ok(Some(element)) = document.query_selector(selector) else {
        return false;
    };
    element
        .dyn_into::<web_sys::HtmlElement>()
        .map(|element| element.focus().is_ok())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn focus_first_match(_selector: &str) -> bool {
    false
}

/// Desktop area above the taskbar.
pub fn desktop_viewport_rect() -> WindowRect {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(1280.0) as i32;
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .unwrap_or(800.0) as i32;
            return WindowRect {
                x: 0,
                y: 0,
                w: width.max(320),
                h: (height - TASKBAR_HEIGHT_PX).max(240),
            };
        }
    }

    WindowRect {
        x: 0,
        y: 0,
        w: 1280,
        h: 800 - TASKBAR_HEIGHT_PX,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dom_ids_derive_from_app_id() {
        let app = ApplicationId::trusted("email");
        assert_eq!(window_dom_id(&app), "win-email");
        assert_eq!(taskbar_button_dom_id(&app), "task-email");
        assert_eq!(
            window_primary_input_selector(&app),
            "#win-email [data-autofocus]"
        );
    }

    #[test]
    fn headless_viewport_excludes_taskbar() {
        let viewport = desktop_viewport_rect();
        assert_eq!(viewport.h + TASKBAR_HEIGHT_PX, 800);
        assert!(!focus_first_match("#win-notes"));
    }
}
