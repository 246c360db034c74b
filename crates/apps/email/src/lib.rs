//! Email desktop app: folders, reading pane and a compose modal.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod compose;
mod mailbox;

use desktop_app_contract::AppViewContext;
use leptos::*;
use platform_host::MailFolder;

pub use compose::{ComposeError, ComposeField, ComposeForm};
pub use mailbox::{EmailAction, EmailEffect, EmailState};

#[component]
/// Email window contents.
pub fn EmailApp(
    /// Runtime-provided state and dispatch for this window.
    ctx: AppViewContext<EmailState, EmailAction>,
) -> impl IntoView {
    let state = ctx.state;
    let emails = Signal::derive(move || state.with(|s| s.active_emails().to_vec()));
    let compose_open = Signal::derive(move || state.with(|s| s.compose.is_some()));

    view! {
        <div class="app-email">
            <nav class="email-sidebar" aria-label="Folders">
                <button
                    type="button"
                    class="email-compose-button"
                    data-autofocus=""
                    on:click=move |_| ctx.dispatch(EmailAction::OpenCompose)
                >
                    "Compose"
                </button>
                {MailFolder::ALL
                    .into_iter()
                    .map(|folder| {
                        view! {
                            <button
                                type="button"
                                class="email-folder"
                                class:active=move || state.with(|s| s.active_folder == folder)
                                data-folder=folder.as_str()
                                on:click=move |_| ctx.dispatch(EmailAction::SelectFolder(folder))
                            >
                                {folder.label()}
                                {move || {
                                    let unread = state.with(EmailState::unread_count);
                                    (folder == MailFolder::Inbox && unread > 0)
                                        .then(|| view! { <span class="email-badge">{unread}</span> })
                                }}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>

            <section class="email-list" aria-label="Messages">
                {move || {
                    state
                        .with(|s| s.folder(s.active_folder).notice().map(str::to_string))
                        .map(|notice| view! { <div class="app-notice" role="status">{notice}</div> })
                }}
                <Show
                    when=move || !state.with(|s| s.folder(s.active_folder).is_loading())
                    fallback=|| view! { <p class="email-empty">"Loading..."</p> }
                >
                    <Show
                        when=move || !emails.with(Vec::is_empty)
                        fallback=|| view! { <p class="email-empty">"No messages"</p> }
                    >
                        <ul class="email-rows">
                            <For each=move || emails.get() key=|email| (email.id.clone(), email.is_read) let:email>
                                {
                                    let click_id = email.id.clone();
                                    let selected_id = email.id.clone();
                                    view! {
                                        <li
                                            class="email-row"
                                            class:unread=!email.is_read
                                            class:selected=move || state.with(|s| s.selected.as_ref() == Some(&selected_id))
                                            on:click=move |_| ctx.dispatch(EmailAction::SelectEmail(click_id.clone()))
                                        >
                                            <span class="email-sender">{email.sender.clone()}</span>
                                            <span class="email-subject">{email.subject.clone()}</span>
                                            <span class="email-snippet">{email.snippet.clone()}</span>
                                            <span class="email-date">{email.date.clone()}</span>
                                        </li>
                                    }
                                }
                            </For>
                        </ul>
                    </Show>
                </Show>
            </section>

            <article class="email-reader">
                {move || match state.with(|s| s.selected_email().cloned()) {
                    Some(email) => view! {
                        <h2>{email.subject}</h2>
                        <p class="email-from">{email.sender}" - "{email.date}</p>
                        <pre class="email-body">{email.body}</pre>
                    }
                    .into_view(),
                    None => view! { <p class="email-placeholder">"Select a message"</p> }.into_view(),
                }}
            </article>

            <Show when=move || compose_open.get()>
                <ComposeModal ctx=ctx/>
            </Show>
        </div>
    }
}

#[component]
fn ComposeModal(ctx: AppViewContext<EmailState, EmailAction>) -> impl IntoView {
    let state = ctx.state;
    let field_value = move |field: ComposeField| {
        state.with(|s| {
            s.compose
                .as_ref()
                .map(|form| form.get(field).to_string())
                .unwrap_or_default()
        })
    };
    let error = Signal::derive(move || {
        state.with(|s| s.compose.as_ref().and_then(|form| form.error))
    });

    view! {
        <div class="email-compose-backdrop">
            <div class="email-compose" role="dialog" aria-modal="true" aria-label="New Message">
                <header>"New Message"</header>
                <input
                    type="email"
                    name="to"
                    placeholder="To"
                    prop:value=move || field_value(ComposeField::To)
                    on:input=move |ev| ctx.dispatch(EmailAction::EditCompose(ComposeField::To, event_target_value(&ev)))
                />
                <input
                    type="text"
                    name="subject"
                    placeholder="Subject"
                    prop:value=move || field_value(ComposeField::Subject)
                    on:input=move |ev| ctx.dispatch(EmailAction::EditCompose(ComposeField::Subject, event_target_value(&ev)))
                />
                <textarea
                    name="body"
                    placeholder="Message"
                    prop:value=move || field_value(ComposeField::Body)
                    on:input=move |ev| ctx.dispatch(EmailAction::EditCompose(ComposeField::Body, event_target_value(&ev)))
                />
                {move || {
                    error
                        .get()
                        .map(|err| view! { <p class="email-compose-error" role="alert">{err.to_string()}</p> })
                }}
                <footer>
                    <button type="button" on:click=move |_| ctx.dispatch(EmailAction::DiscardCompose)>
                        "Discard"
                    </button>
                    <button type="button" class="primary" on:click=move |_| ctx.dispatch(EmailAction::Send)>
                        "Send"
                    </button>
                </footer>
            </div>
        </div>
    }
}
