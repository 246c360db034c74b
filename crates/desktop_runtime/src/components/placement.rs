use super::*;
use crate::model::SplitPlacement;

#[component]
pub(super) fn PlacementPrompt() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let pending = create_memo(move |_| runtime.state.with(|s| s.pending_placement.is_some()));
    let place = move |placement: SplitPlacement| {
        runtime.dispatch_action(DesktopAction::ConfirmPlacement { placement })
    };

    view! {
        <Show when=move || pending.get()>
            <div
                id=dom::PLACEMENT_PROMPT_DOM_ID
                class="placement-backdrop"
                role="dialog"
                aria-modal="true"
                aria-labelledby="placement-title"
            >
                <div class="placement-panel">
                    <h3 id="placement-title">"Where should this open?"</h3>
                    <div class="placement-options">
                        <button type="button" on:click=move |_| place(SplitPlacement::Left)>
                            "Replace Left"
                        </button>
                        <button type="button" on:click=move |_| place(SplitPlacement::Right)>
                            "Replace Right"
                        </button>
                        <button type="button" on:click=move |_| place(SplitPlacement::Over)>
                            "Open Over"
                        </button>
                    </div>
                    <button
                        type="button"
                        class="placement-cancel"
                        on:click=move |_| runtime.dispatch_action(DesktopAction::CancelPlacement)
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </Show>
    }
}
