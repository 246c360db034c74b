use super::*;
use crate::{
    dom::{START_MENU_DOM_ID, TASKBAR_DIMMED_CLASS},
    taskbar::{enabled_consent_count, taskbar_aria_label, taskbar_entries, TaskbarEntry},
};

fn taskbar_button_class(entry: &TaskbarEntry) -> String {
    let mut class = String::from("taskbar-button");
    if entry.dimmed {
        class.push(' ');
        class.push_str(TASKBAR_DIMMED_CLASS);
    }
    if entry.focused {
        class.push_str(" focused");
    }
    class
}

#[component]
pub(super) fn Taskbar() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;
    let entries = create_memo(move |_| state.with(taskbar_entries));
    let start_open = Signal::derive(move || state.with(|s| s.start_menu.is_opening_or_open()));
    let consent_label = Signal::derive(move || {
        state.with(|s| {
            if s.consent.is_loading() {
                "Privacy: ...".to_string()
            } else if let Some(notice) = s.consent.notice() {
                format!("Privacy: {notice}")
            } else {
                format!("Privacy: {} sources on", enabled_consent_count(s))
            }
        })
    });
    let dark_mode = Signal::derive(move || state.with(|s| s.theme.dark_mode));

    view! {
        <footer class="taskbar" role="toolbar" aria-label="Taskbar">
            <button
                id="start-button"
                type="button"
                class="taskbar-start"
                class:active=move || start_open.get()
                aria-haspopup="menu"
                aria-controls=START_MENU_DOM_ID
                aria-expanded=move || start_open.get().to_string()
                on:mousedown=move |ev| stop_mouse_event(&ev)
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    runtime.dispatch_action(DesktopAction::ToggleStartMenu);
                }
            >
                "Start"
            </button>

            <div class="taskbar-windows" role="list">
                <For
                    each=move || entries.get()
                    key=|entry| (entry.window_id.0, entry.dimmed, entry.focused)
                    let:entry
                >
                    {
                        let window_id = entry.window_id;
                        view! {
                            <button
                                id=entry.dom_id.clone()
                                type="button"
                                role="listitem"
                                class=taskbar_button_class(&entry)
                                data-state=if entry.dimmed { "minimized" } else { "open" }
                                aria-pressed=entry.focused.to_string()
                                aria-label=taskbar_aria_label(&entry)
                                on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::ToggleTaskbarWindow {
                                        window_id,
                                    })
                                }
                            >
                                <span class="taskbar-button-icon" aria-hidden="true">
                                    {entry.icon.clone()}
                                </span>
                                <span class="taskbar-button-label">{entry.title.clone()}</span>
                            </button>
                        }
                    }
                </For>
            </div>

            <div class="taskbar-tray">
                <span class="taskbar-consent" title=consent_label>
                    {consent_label}
                </span>
                <button
                    type="button"
                    class="taskbar-theme-toggle"
                    aria-pressed=move || dark_mode.get().to_string()
                    on:click=move |_| runtime.dispatch_action(DesktopAction::ToggleDarkMode)
                >
                    {move || if dark_mode.get() { "Light mode" } else { "Dark mode" }}
                </button>
            </div>
        </footer>
    }
}
