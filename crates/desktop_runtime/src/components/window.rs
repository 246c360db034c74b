use desktop_app_contract::{AppLifecycleEvent, AppViewContext, ApplicationId};
use desktop_app_email::EmailApp;
use desktop_app_flashcards::FlashcardsApp;
use desktop_app_jarvis::JarvisApp;
use desktop_app_notes::NotesApp;
use desktop_app_whiteboard::WhiteboardApp;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use super::*;
use crate::{
    app_runtime::{AppAction, AppSession},
    model::{DesktopState, WindowId, WindowVisibility},
};

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

fn window_class(focused: bool, visibility: WindowVisibility) -> String {
    let mut class = String::from("desktop-window");
    if focused {
        class.push_str(" focused");
    }
    if visibility == WindowVisibility::Minimized {
        class.push(' ');
        class.push_str(dom::MINIMIZED_CLASS);
    }
    class
}

/// Windows `window_id` can be paired with: every other window outside the current split.
fn snap_candidates(state: &DesktopState, window_id: WindowId) -> Vec<(WindowId, String)> {
    state
        .windows
        .iter()
        .filter(|w| w.id != window_id && !state.split.is_some_and(|pair| pair.contains(w.id)))
        .map(|w| (w.id, w.title.clone()))
        .collect()
}

fn is_primary_press(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let window = create_memo(move |_| runtime.state.with(|s| s.window(window_id).cloned()));
    let Some(app_id) = window.get_untracked().map(|w| w.app_id) else {
        return ().into_view();
    };
    let dom_id = dom::window_dom_id(&app_id);

    let focus = move |_| {
        let should_focus = window
            .with_untracked(|w| w.as_ref().map(|w| !w.is_focused))
            .unwrap_or(false);
        if should_focus {
            runtime.dispatch_action(DesktopAction::FocusWindow { window_id });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id,
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let visibility = move || {
        window.with(|w| {
            w.as_ref()
                .map(|w| w.visibility)
                .unwrap_or(WindowVisibility::Minimized)
        })
    };
    let title = move || window.with(|w| w.as_ref().map(|w| w.title.clone()).unwrap_or_default());
    let split_menu_open = create_rw_signal(false);
    let candidates = create_memo(move |_| runtime.state.with(|s| snap_candidates(s, window_id)));
    let icon = move || window.with(|w| w.as_ref().map(|w| w.icon.clone()).unwrap_or_default());

    view! {
        <section
            id=dom_id
            class=move || {
                let focused = window.with(|w| w.as_ref().is_some_and(|w| w.is_focused));
                window_class(focused, visibility())
            }
            data-state=move || visibility().as_str()
            aria-hidden=move || (visibility() == WindowVisibility::Minimized).to_string()
            style=move || {
                window.with(|w| {
                    w.as_ref()
                        .map(|w| {
                            format!(
                                "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                                w.rect.x, w.rect.y, w.rect.w, w.rect.h, w.z_index
                            )
                        })
                        .unwrap_or_default()
                })
            }
            on:pointerdown=focus
            role="dialog"
            aria-label=title
        >
            <header class="titlebar" on:pointerdown=begin_move>
                <div class="titlebar-title">
                    <span class="titlebar-app-icon" aria-hidden="true">{icon}</span>
                    <span>{title}</span>
                </div>
                <div class="titlebar-controls">
                    <button
                        type="button"
                        aria-label="Split with another window"
                        aria-expanded=move || split_menu_open.get().to_string()
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:mousedown=move |ev| stop_mouse_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            split_menu_open.update(|open| *open = !*open);
                        }
                    >
                        "||"
                    </button>
                    <Show when=move || split_menu_open.get()>
                        <div
                            class="split-menu"
                            role="menu"
                            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        >
                            <Show
                                when=move || candidates.with(|c| !c.is_empty())
                                fallback=|| view! { <p class="split-menu-empty">"No other free apps"</p> }
                            >
                                <For
                                    each=move || candidates.get()
                                    key=|(other, _)| other.0
                                    let:candidate
                                >
                                    {
                                        let (other, label) = candidate;
                                        view! {
                                            <button
                                                type="button"
                                                role="menuitem"
                                                on:click=move |ev| {
                                                    stop_mouse_event(&ev);
                                                    split_menu_open.set(false);
                                                    runtime.dispatch_action(DesktopAction::SnapPair {
                                                        left: window_id,
                                                        right: other,
                                                        viewport: dom::desktop_viewport_rect(),
                                                    });
                                                }
                                            >
                                                {label}
                                            </button>
                                        }
                                    }
                                </For>
                            </Show>
                        </div>
                    </Show>
                    <button
                        type="button"
                        aria-label="Minimize window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:mousedown=move |ev| stop_mouse_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            runtime.dispatch_action(DesktopAction::MinimizeWindow { window_id });
                        }
                    >
                        "_"
                    </button>
                    <button
                        type="button"
                        aria-label="Close window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:mousedown=move |ev| stop_mouse_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            runtime.dispatch_action(DesktopAction::CloseWindow { window_id });
                        }
                    >
                        "x"
                    </button>
                </div>
            </header>
            <div class="window-body">
                <WindowBody window_id=window_id app_id=app_id />
            </div>
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::North />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::South />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::East />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::West />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::NorthEast />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::NorthWest />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::SouthEast />
            <WindowResizeHandle window_id=window_id edge=ResizeEdge::SouthWest />
        </section>
    }
    .into_view()
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let class_name = format!("window-resize-handle {}", resize_edge_class(edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_primary_press(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id,
            edge,
            pointer: pointer_from_pointer_event(&ev),
        });
    };

    view! { <div class=class_name aria-hidden="true" on:pointerdown=on_pointerdown /> }
}

/// Builds the per-window context for an app view from the runtime-owned session.
fn app_view_context<S, A>(
    runtime: DesktopRuntimeContext,
    window_id: WindowId,
    project: fn(&AppSession) -> Option<&S>,
    wrap: fn(A) -> AppAction,
) -> AppViewContext<S, A>
where
    S: Clone + Default + PartialEq + 'static,
    A: 'static,
{
    let state = create_memo(move |_| {
        runtime.state.with(|desktop| {
            desktop
                .sessions
                .get(&window_id)
                .and_then(|session| project(&session.app))
                .cloned()
                .unwrap_or_default()
        })
    });
    let lifecycle = create_memo(move |_| {
        runtime.state.with(|desktop| {
            desktop
                .sessions
                .get(&window_id)
                .map(|session| session.lifecycle)
                .unwrap_or(AppLifecycleEvent::Closed)
        })
    });
    let dispatch = Callback::new(move |action: A| {
        runtime.dispatch_action(DesktopAction::App {
            window_id,
            action: wrap(action),
        });
    });
    AppViewContext::new(window_id.0, state.into(), lifecycle.into(), dispatch)
}

#[component]
fn WindowBody(window_id: WindowId, app_id: ApplicationId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let contents = match app_id.as_str() {
        "notes" => {
            let ctx = app_view_context(runtime, window_id, AppSession::as_notes, AppAction::Notes);
            view! { <NotesApp ctx=ctx /> }.into_view()
        }
        "flashcards" => {
            let ctx = app_view_context(
                runtime,
                window_id,
                AppSession::as_flashcards,
                AppAction::Flashcards,
            );
            view! { <FlashcardsApp ctx=ctx /> }.into_view()
        }
        "email" => {
            let ctx = app_view_context(runtime, window_id, AppSession::as_email, AppAction::Email);
            view! { <EmailApp ctx=ctx /> }.into_view()
        }
        "whiteboard" => {
            let ctx = app_view_context(
                runtime,
                window_id,
                AppSession::as_whiteboard,
                AppAction::Whiteboard,
            );
            view! { <WhiteboardApp ctx=ctx /> }.into_view()
        }
        "jarvis" => {
            let ctx =
                app_view_context(runtime, window_id, AppSession::as_jarvis, AppAction::Jarvis);
            view! { <JarvisApp ctx=ctx /> }.into_view()
        }
        other => {
            logging::warn!("no view registered for app `{other}`");
            view! { <p class="window-missing">"App unavailable"</p> }.into_view()
        }
    };

    view! { <div class="window-body-content">{contents}</div> }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn split_candidates_skip_self_and_the_current_pair() {
        use crate::model::{SplitPair, WindowRect};
        use crate::window_manager::tile_split_pair;

        let mut state = DesktopState::default();
        for (id, title) in [(1, "Notes"), (2, "Email"), (3, "Jarvis")] {
            state.windows.push(crate::model::WindowRecord {
                id: WindowId(id),
                app_id: ApplicationId::trusted(title.to_lowercase()),
                title: title.to_string(),
                icon: String::new(),
                rect: WindowRect::default(),
                restore_rect: None,
                z_index: 0,
                is_focused: false,
                visibility: WindowVisibility::Open,
            });
        }
        assert_eq!(
            snap_candidates(&state, WindowId(1)),
            vec![(WindowId(2), "Email".to_string()), (WindowId(3), "Jarvis".to_string())]
        );

        tile_split_pair(
            &mut state,
            SplitPair {
                left: WindowId(1),
                right: WindowId(2),
                viewport: WindowRect::default(),
            },
        );
        assert_eq!(
            snap_candidates(&state, WindowId(3)),
            Vec::<(WindowId, String)>::new()
        );
        assert_eq!(
            snap_candidates(&state, WindowId(1)),
            vec![(WindowId(3), "Jarvis".to_string())]
        );
    }

    #[test]
    fn minimized_window_carries_marker_class() {
        assert_eq!(
            window_class(true, WindowVisibility::Open),
            "desktop-window focused"
        );
        assert_eq!(
            window_class(false, WindowVisibility::Minimized),
            "desktop-window minimized"
        );
    }
}
