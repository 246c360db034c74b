use super::*;

#[component]
pub(super) fn NoticeTray() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let notices = create_memo(move |_| runtime.state.with(|s| s.notices.clone()));

    view! {
        <div class="notice-tray" role="status" aria-live="polite">
            <For each=move || notices.get() key=|notice| notice.id let:notice>
                {
                    let id = notice.id;
                    view! {
                        <div class=format!("notice notice-{}", notice.level.as_str())>
                            <span class="notice-text">{notice.text.clone()}</span>
                            <button
                                type="button"
                                class="notice-dismiss"
                                aria-label="Dismiss notice"
                                on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::DismissNotice { id })
                                }
                            >
                                "x"
                            </button>
                        </div>
                    }
                }
            </For>
        </div>
    }
}
