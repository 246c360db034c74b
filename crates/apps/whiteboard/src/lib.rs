//! Whiteboard desktop app: a freehand/shape drawing surface rendered as SVG.
//!
//! The surface is bound to its hosting window. Minimizing pauses drawing and closing releases
//! every shape; see [`SurfaceLifecycle`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod surface;

use desktop_app_contract::AppViewContext;
use leptos::*;

pub use surface::{
    Point, Shape, SurfaceLifecycle, Tool, WhiteboardAction, WhiteboardState, ERASER_COLOR,
};

const SURFACE_WIDTH: u32 = 800;
const SURFACE_HEIGHT: u32 = 480;

fn pointer_point(ev: &ev::PointerEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

fn render_shape(shape: &Shape) -> View {
    match shape {
        Shape::Stroke {
            points,
            color,
            width,
        } => view! {
            <polyline
                points=Shape::svg_points(points)
                fill="none"
                stroke=color.clone()
                stroke-width=*width
                stroke-linecap="round"
                stroke-linejoin="round"
            />
        }
        .into_view(),
        Shape::Rect {
            origin,
            width,
            height,
            color,
        } => view! {
            <rect
                x=origin.x.min(origin.x + width)
                y=origin.y.min(origin.y + height)
                width=width.abs()
                height=height.abs()
                fill="none"
                stroke=color.clone()
                stroke-width=2
            />
        }
        .into_view(),
        Shape::Circle {
            center,
            radius,
            color,
        } => view! {
            <circle cx=center.x cy=center.y r=*radius fill="none" stroke=color.clone() stroke-width=2/>
        }
        .into_view(),
    }
}

#[component]
/// Whiteboard window contents.
pub fn WhiteboardApp(
    /// Runtime-provided state and dispatch for this window.
    ctx: AppViewContext<WhiteboardState, WhiteboardAction>,
) -> impl IntoView {
    let state = ctx.state;
    let active = Signal::derive(move || state.with(WhiteboardState::render_loop_active));

    view! {
        <div
            class="app-whiteboard"
            data-surface=move || state.with(|s| s.lifecycle().as_str())
        >
            <div class="whiteboard-toolbar" role="toolbar" aria-label="Drawing tools">
                {Tool::ALL
                    .into_iter()
                    .map(|tool| {
                        view! {
                            <button
                                type="button"
                                class="whiteboard-tool"
                                class:active=move || state.with(|s| s.tool == tool)
                                aria-pressed=move || state.with(|s| (s.tool == tool).to_string())
                                on:click=move |_| ctx.dispatch(WhiteboardAction::SelectTool(tool))
                            >
                                {tool.label()}
                            </button>
                        }
                    })
                    .collect_view()}
                <input
                    type="color"
                    aria-label="Stroke color"
                    prop:value=move || state.with(|s| s.color.clone())
                    on:input=move |ev| {
                        ctx.dispatch(WhiteboardAction::SelectColor(event_target_value(&ev)))
                    }
                />
                <button
                    type="button"
                    class="whiteboard-clear"
                    on:click=move |_| ctx.dispatch(WhiteboardAction::Clear)
                >
                    "Clear"
                </button>
            </div>

            <Show
                when=move || active.get()
                fallback=|| view! { <div class="whiteboard-paused">"Drawing paused"</div> }
            >
                <svg
                    class="whiteboard-surface"
                    width=SURFACE_WIDTH
                    height=SURFACE_HEIGHT
                    viewBox=format!("0 0 {SURFACE_WIDTH} {SURFACE_HEIGHT}")
                    on:pointerdown=move |ev| ctx.dispatch(WhiteboardAction::PointerDown(pointer_point(&ev)))
                    on:pointermove=move |ev| ctx.dispatch(WhiteboardAction::PointerMove(pointer_point(&ev)))
                    on:pointerup=move |ev| ctx.dispatch(WhiteboardAction::PointerUp(pointer_point(&ev)))
                    on:pointerleave=move |ev| ctx.dispatch(WhiteboardAction::PointerUp(pointer_point(&ev)))
                >
                    <rect width="100%" height="100%" fill=ERASER_COLOR/>
                    {move || {
                        state.with(|s| {
                            s.shapes.iter().chain(s.draft.as_ref()).map(render_shape).collect_view()
                        })
                    }}
                </svg>
            </Show>
        </div>
    }
}
