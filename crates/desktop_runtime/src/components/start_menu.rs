use super::*;
use crate::{
    apps::launcher_apps,
    dom::{START_MENU_DOM_ID, START_MENU_READY_CLASS},
    start_menu::StartMenuPhase,
};

fn start_menu_class(phase: StartMenuPhase) -> String {
    if phase.is_ready() {
        format!("start-menu {START_MENU_READY_CLASS}")
    } else {
        "start-menu".to_string()
    }
}

#[component]
pub(super) fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let phase = Signal::derive(move || runtime.state.with(|s| s.start_menu));

    view! {
        <Show when=move || phase.get().is_visible() fallback=|| ()>
            <nav
                id=START_MENU_DOM_ID
                class=move || start_menu_class(phase.get())
                data-state=move || phase.get().as_str()
                aria-label="Start menu"
                on:mousedown=move |ev| ev.stop_propagation()
            >
                <ul role="menu">
                    {launcher_apps()
                        .into_iter()
                        .map(|entry| {
                            view! {
                                <li role="none">
                                    <button
                                        type="button"
                                        role="menuitem"
                                        class="start-menu-item"
                                        data-app-id=entry.app_id
                                        on:click=move |_| {
                                            runtime.dispatch_action(DesktopAction::Launch {
                                                app_id: entry.application_id(),
                                                viewport: Some(dom::desktop_viewport_rect()),
                                            });
                                        }
                                    >
                                        <span class="start-menu-icon" aria-hidden="true">
                                            {entry.icon}
                                        </span>
                                        <span>{entry.display_name}</span>
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ready_marker_only_once_open_settles() {
        assert_eq!(
            start_menu_class(StartMenuPhase::Opening { settle_at_ms: 5 }),
            "start-menu"
        );
        assert_eq!(start_menu_class(StartMenuPhase::Open), "start-menu start-menu-ready");
        assert_eq!(
            start_menu_class(StartMenuPhase::Closing { settle_at_ms: 5 }),
            "start-menu"
        );
    }
}
