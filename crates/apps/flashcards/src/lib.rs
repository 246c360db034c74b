//! Flashcards desktop app: deck list and flip-and-rate study sessions.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod session;

use desktop_app_contract::AppViewContext;
use leptos::*;

pub use session::{
    FlashcardsAction, FlashcardsEffect, FlashcardsState, Rating, SessionSummary, StudyMode,
    StudySession,
};

#[component]
/// Flashcards window contents.
pub fn FlashcardsApp(
    /// Runtime-provided state and dispatch for this window.
    ctx: AppViewContext<FlashcardsState, FlashcardsAction>,
) -> impl IntoView {
    let state = ctx.state;
    let session = Signal::derive(move || state.with(|s| s.session().cloned()));

    view! {
        <div class="app-flashcards">
            {move || match session.get() {
                Some(session) => view! { <StudyView session=session ctx=ctx/> }.into_view(),
                None => view! { <DeckList ctx=ctx/> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn StudyView(
    session: StudySession,
    ctx: AppViewContext<FlashcardsState, FlashcardsAction>,
) -> impl IntoView {
    let Some(card) = session.current().cloned() else {
        return view! { <p class="flashcards-empty">"This deck has no cards"</p> }.into_view();
    };
    let flipped = session.flipped;

    view! {
        <div class="flashcards-study">
            <div class="flashcards-study-header">
                <button type="button" on:click=move |_| ctx.dispatch(FlashcardsAction::ExitSession)>
                    "Back to Decks"
                </button>
                <span class="flashcards-progress">{session.progress_label()}</span>
            </div>
            <button
                type="button"
                class="flashcard"
                class:flipped=flipped
                data-state=if flipped { "back" } else { "front" }
                on:click=move |_| ctx.dispatch(FlashcardsAction::Flip)
            >
                {if flipped { card.back } else { card.front }}
            </button>
            <Show
                when=move || flipped
                fallback=|| view! { <p class="flashcards-hint">"Click to flip"</p> }
            >
                <div class="flashcards-rating">
                    <button type="button" on:click=move |_| ctx.dispatch(FlashcardsAction::Rate(Rating::Hard))>
                        "Hard"
                    </button>
                    <button type="button" on:click=move |_| ctx.dispatch(FlashcardsAction::Rate(Rating::Easy))>
                        "Easy"
                    </button>
                </div>
            </Show>
        </div>
    }
    .into_view()
}

#[component]
fn DeckList(ctx: AppViewContext<FlashcardsState, FlashcardsAction>) -> impl IntoView {
    let state = ctx.state;
    let decks = Signal::derive(move || state.with(|s| s.decks.items().to_vec()));
    let summary = Signal::derive(move || {
        state.with(|s| match &s.mode {
            StudyMode::Browsing { last_summary } => last_summary.clone(),
            StudyMode::Studying(_) => None,
        })
    });

    view! {
        <div class="flashcards-decks">
            {move || {
                summary.get().map(|summary| {
                    view! {
                        <div class="app-notice flashcards-summary" role="status">
                            <strong>"Session complete"</strong>
                            {format!(
                                " {}: {} easy, {} hard",
                                summary.deck_title,
                                summary.easy,
                                summary.hard,
                            )}
                            <button type="button" on:click=move |_| ctx.dispatch(FlashcardsAction::DismissSummary)>
                                "Dismiss"
                            </button>
                        </div>
                    }
                })
            }}
            {move || {
                state.with(|s| s.decks.notice().map(str::to_string)).map(|notice| {
                    view! { <div class="app-notice" role="status">{notice}</div> }
                })
            }}
            <div class="flashcards-toolbar">
                <button type="button" on:click=move |_| ctx.dispatch(FlashcardsAction::Reload)>"Reload"</button>
            </div>
            <Show
                when=move || !state.with(|s| s.decks.is_loading())
                fallback=|| view! { <p class="flashcards-empty">"Loading decks..."</p> }
            >
                <ul class="flashcards-deck-grid">
                    <For each=move || decks.get() key=|deck| deck.id.clone() let:deck>
                        {
                            let deck_id = deck.id.clone();
                            let card_count = deck.cards.len();
                            view! {
                                <li class="flashcards-deck">
                                    <h3>{deck.title.clone()}</h3>
                                    <p>{deck.description.clone()}</p>
                                    <span class="flashcards-count">{format!("{card_count} cards")}</span>
                                    <button
                                        type="button"
                                        disabled={card_count == 0}
                                        on:click=move |_| ctx.dispatch(FlashcardsAction::Study(deck_id.clone()))
                                    >
                                        "Study"
                                    </button>
                                </li>
                            }
                        }
                    </For>
                </ul>
            </Show>
        </div>
    }
}
