//! Jarvis desktop app: context-aware chat assistant window.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod chat;

use desktop_app_contract::AppViewContext;
use leptos::*;
use platform_host::ChatRole;

pub use chat::{
    ChatContext, ChatFailure, ChatMessage, ChatPhase, JarvisAction, JarvisEffect, JarvisState,
    DEFAULT_REPLY_TIMEOUT_MS,
};

#[component]
fn ContextPanel(ctx: AppViewContext<JarvisState, JarvisAction>) -> impl IntoView {
    let state = ctx.state;
    view! {
        <aside class="jarvis-contexts" class:collapsed=move || state.with(|s| !s.context_panel_open)>
            <h3>"Context Mode"</h3>
            {ChatContext::ALL
                .into_iter()
                .map(|context| {
                    view! {
                        <button
                            type="button"
                            class="jarvis-context"
                            class:active=move || state.with(|s| s.context == context)
                            data-context=context.token()
                            on:click=move |_| ctx.dispatch(JarvisAction::SelectContext(context))
                        >
                            <span class="jarvis-context-icon">{context.icon()}</span>
                            <span class="jarvis-context-label">{context.label()}</span>
                            <span class="jarvis-context-description">{context.description()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </aside>
    }
}

#[component]
/// Jarvis window contents.
pub fn JarvisApp(
    /// Runtime-provided state and dispatch for this window.
    ctx: AppViewContext<JarvisState, JarvisAction>,
) -> impl IntoView {
    let state = ctx.state;
    let messages = Signal::derive(move || state.with(|s| s.messages.clone()));
    let busy = Signal::derive(move || state.with(JarvisState::is_busy));

    view! {
        <div class="app-jarvis" data-state=move || state.with(|s| s.phase.as_str())>
            <ContextPanel ctx=ctx/>
            <section class="jarvis-chat">
                <button
                    type="button"
                    class="jarvis-context-toggle"
                    title="Toggle Context Menu"
                    on:click=move |_| ctx.dispatch(JarvisAction::ToggleContextPanel)
                >
                    {move || if state.with(|s| s.context_panel_open) { "<" } else { "=" }}
                </button>

                <ol class="jarvis-messages" aria-live="polite">
                    <For each=move || messages.get() key=|message| message.id let:message>
                        <li
                            class="jarvis-message"
                            class:from-user=message.role == ChatRole::User
                            class:from-assistant=message.role == ChatRole::Assistant
                            data-context=message.context.token()
                        >
                            {message.content}
                        </li>
                    </For>
                    <Show when=move || busy.get()>
                        <li class="jarvis-message jarvis-typing">"Jarvis is thinking..."</li>
                    </Show>
                </ol>

                {move || match state.with(|s| s.phase.clone()) {
                    ChatPhase::Failed { failure, .. } => view! {
                        <div class="app-notice jarvis-error" role="alert">
                            <span>{failure.message()}</span>
                            <button type="button" on:click=move |_| ctx.dispatch(JarvisAction::Retry)>
                                "Retry"
                            </button>
                        </div>
                    }
                    .into_view(),
                    _ => ().into_view(),
                }}

                <div class="jarvis-input">
                    <textarea
                        data-autofocus=""
                        placeholder=move || state.with(JarvisState::placeholder)
                        aria-label="Message Jarvis"
                        prop:value=move || state.with(|s| s.draft.clone())
                        on:input=move |ev| ctx.dispatch(JarvisAction::EditDraft(event_target_value(&ev)))
                        on:keydown=move |ev: ev::KeyboardEvent| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                ctx.dispatch(JarvisAction::Send);
                            }
                        }
                    ></textarea>
                    <button
                        type="button"
                        class="jarvis-send"
                        disabled=move || state.with(|s| !s.can_send())
                        on:click=move |_| ctx.dispatch(JarvisAction::Send)
                    >
                        "Send"
                    </button>
                </div>
                <p class="jarvis-disclaimer">"Jarvis can make mistakes. Please verify important information."</p>
            </section>
        </div>
    }
}
