//! Notes desktop app: searchable note list with a read-only detail pane.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod state;

use desktop_app_contract::AppViewContext;
use leptos::*;

pub use state::{NotesAction, NotesEffect, NotesState};

#[component]
/// Notes window contents.
pub fn NotesApp(
    /// Runtime-provided state and dispatch for this window.
    ctx: AppViewContext<NotesState, NotesAction>,
) -> impl IntoView {
    let state = ctx.state;
    let visible = Signal::derive(move || {
        state.with(|s| s.visible_notes().into_iter().cloned().collect::<Vec<_>>())
    });
    let is_loading = Signal::derive(move || state.with(|s| s.notes.is_loading()));

    view! {
        <div class="app-notes">
            <div class="notes-toolbar">
                <input
                    type="search"
                    class="notes-search"
                    data-autofocus=""
                    placeholder="Search notes..."
                    aria-label="Search notes"
                    prop:value=move || state.with(|s| s.query.clone())
                    on:input=move |ev| ctx.dispatch(NotesAction::SetQuery(event_target_value(&ev)))
                />
                <button type="button" class="notes-reload" on:click=move |_| ctx.dispatch(NotesAction::Reload)>
                    "Reload"
                </button>
            </div>

            {move || {
                state.with(|s| s.notes.notice().map(str::to_string)).map(|notice| {
                    view! { <div class="app-notice" role="status">{notice}</div> }
                })
            }}

            <div class="notes-body">
                <ul class="notes-list" role="listbox" aria-label="Notes">
                    <Show
                        when=move || !is_loading.get()
                        fallback=|| view! { <li class="notes-empty">"Loading notes..."</li> }
                    >
                        <Show
                            when=move || !visible.with(Vec::is_empty)
                            fallback=|| view! { <li class="notes-empty">"No notes found"</li> }
                        >
                            <For each=move || visible.get() key=|note| note.id.clone() let:note>
                                {
                                    let click_id = note.id.clone();
                                    let selected_id = note.id.clone();
                                    view! {
                                        <li
                                            class="notes-item"
                                            class:selected=move || {
                                                state.with(|s| s.selected.as_deref() == Some(selected_id.as_str()))
                                            }
                                            role="option"
                                            on:click=move |_| ctx.dispatch(NotesAction::Select(click_id.clone()))
                                        >
                                            <span class="notes-item-title">
                                                {note.is_pinned.then_some("* ")}
                                                {note.title.clone()}
                                            </span>
                                            <span class="notes-item-tags">{note.tags.join(", ")}</span>
                                        </li>
                                    }
                                }
                            </For>
                        </Show>
                    </Show>
                </ul>

                <article class="notes-detail">
                    {move || match state.with(|s| s.selected_note().cloned()) {
                        Some(note) => view! {
                            <h2>{note.title}</h2>
                            <p class="notes-date">{note.created_date}</p>
                            <pre class="notes-content">{note.content}</pre>
                        }
                        .into_view(),
                        None => view! { <p class="notes-placeholder">"Select a note to read it"</p> }
                            .into_view(),
                    }}
                </article>
            </div>
        </div>
    }
}
