//! Desktop shell UI composition and interaction surfaces.

mod notices;
mod placement;
mod start_menu;
mod taskbar;
mod window;

use leptos::*;

use self::{
    notices::NoticeTray, placement::PlacementPrompt, start_menu::StartMenu, taskbar::Taskbar,
    window::DesktopWindow,
};
use crate::{
    dom,
    model::{PointerPosition, ResizeEdge},
    reducer::DesktopAction,
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the full desktop shell UI and processes queued [`crate::RuntimeEffect`] values.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let escape_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || ev.key() != "Escape" {
            return;
        }
        if state.with_untracked(|s| s.pending_placement.is_some()) {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CancelPlacement);
        } else if state.with_untracked(|s| s.start_menu.is_opening_or_open()) {
            ev.prevent_default();
            runtime.dispatch_action(DesktopAction::CloseStartMenu);
        }
    });
    on_cleanup(move || escape_listener.remove());

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        let pointer = pointer_from_pointer_event(&ev);
        let interaction = runtime.interaction.get_untracked();

        if interaction.dragging.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
        }
        if interaction.resizing.is_some() {
            runtime.dispatch_action(DesktopAction::UpdateResize { pointer });
        }
    };
    let on_pointer_end = move |_| end_active_pointer_interaction(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            tabindex="-1"
            data-theme=move || if state.with(|s| s.theme.dark_mode) { "dark" } else { "light" }
            data-booted=move || state.with(|s| s.booted.to_string())
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div
                class="desktop-backdrop"
                on:mousedown=move |_| runtime.dispatch_action(DesktopAction::CloseStartMenu)
            />
            <div class="desktop-window-layer">
                <For
                    each=move || state.with(|s| s.windows.iter().map(|w| w.id).collect::<Vec<_>>())
                    key=|window_id| window_id.0
                    let:window_id
                >
                    <DesktopWindow window_id=window_id />
                </For>
            </div>
            <NoticeTray />
            <PlacementPrompt />
            <StartMenu />
            <Taskbar />
        </div>
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn end_active_pointer_interaction(runtime: DesktopRuntimeContext) {
    let interaction = runtime.interaction.get_untracked();
    if interaction.dragging.is_some() {
        runtime.dispatch_action(DesktopAction::EndMoveWithViewport {
            viewport: dom::desktop_viewport_rect(),
        });
    }
    if interaction.resizing.is_some() {
        runtime.dispatch_action(DesktopAction::EndResize);
    }
}

fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}
