//! Drawing surface model: tools, shapes and the surface lifecycle.

use desktop_app_contract::WindowRuntimeId;
use serde::{Deserialize, Serialize};

/// Stroke color painted by the eraser.
pub const ERASER_COLOR: &str = "#ffffff";
const PEN_WIDTH: f64 = 5.0;
const ERASER_WIDTH: f64 = 20.0;

/// Drawing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    /// Freehand stroke in the selected color.
    #[default]
    Pen,
    /// Freehand stroke in the background color.
    Eraser,
    /// Rectangle dragged from a corner.
    Rect,
    /// Circle dragged from its center.
    Circle,
}

impl Tool {
    /// Toolbar order.
    pub const ALL: [Self; 4] = [Self::Pen, Self::Eraser, Self::Rect, Self::Circle];

    /// Toolbar label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pen => "Pen",
            Self::Eraser => "Eraser",
            Self::Rect => "Rectangle",
            Self::Circle => "Circle",
        }
    }
}

/// Surface-local pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawn element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Freehand stroke.
    Stroke {
        /// Points in draw order.
        points: Vec<Point>,
        /// Stroke color.
        color: String,
        /// Stroke width.
        width: f64,
    },
    /// Axis-aligned rectangle; width/height may be negative while dragging up or left.
    Rect {
        /// Anchor corner.
        origin: Point,
        /// Signed width.
        width: f64,
        /// Signed height.
        height: f64,
        /// Outline color.
        color: String,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Outline color.
        color: String,
    },
}

impl Shape {
    fn begin(tool: Tool, at: Point, color: &str) -> Self {
        match tool {
            Tool::Pen => Self::Stroke {
                points: vec![at],
                color: color.to_string(),
                width: PEN_WIDTH,
            },
            Tool::Eraser => Self::Stroke {
                points: vec![at],
                color: ERASER_COLOR.to_string(),
                width: ERASER_WIDTH,
            },
            Tool::Rect => Self::Rect {
                origin: at,
                width: 0.0,
                height: 0.0,
                color: color.to_string(),
            },
            Tool::Circle => Self::Circle {
                center: at,
                radius: 0.0,
                color: color.to_string(),
            },
        }
    }

    fn extend(&mut self, to: Point) {
        match self {
            Self::Stroke { points, .. } => points.push(to),
            Self::Rect {
                origin,
                width,
                height,
                ..
            } => {
                *width = to.x - origin.x;
                *height = to.y - origin.y;
            }
            Self::Circle { center, radius, .. } => {
                *radius = (to.x - center.x).hypot(to.y - center.y);
            }
        }
    }

    /// SVG `points` attribute for strokes.
    pub fn svg_points(points: &[Point]) -> String {
        points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Surface lifecycle, tied to the hosting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceLifecycle {
    /// No window has mounted the surface yet.
    #[default]
    Unmounted,
    /// Mounted and visible; the render loop runs.
    Running,
    /// Mounted but hidden (window minimized); the render loop is paused.
    Paused,
    /// Window closed; all resources dropped. Terminal.
    Released,
}

impl SurfaceLifecycle {
    /// Stable token for `data-state`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unmounted => "unmounted",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Released => "released",
        }
    }
}

/// Whiteboard window state owned by the desktop runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhiteboardState {
    window_id: Option<WindowRuntimeId>,
    lifecycle: SurfaceLifecycle,
    /// Selected tool.
    pub tool: Tool,
    /// Selected color (`#rrggbb`).
    pub color: String,
    /// Finished shapes, oldest first.
    pub shapes: Vec<Shape>,
    /// Shape under the pointer while a drag is in progress.
    pub draft: Option<Shape>,
}

impl Default for WhiteboardState {
    fn default() -> Self {
        Self {
            window_id: None,
            lifecycle: SurfaceLifecycle::Unmounted,
            tool: Tool::Pen,
            color: "#000000".to_string(),
            shapes: Vec::new(),
            draft: None,
        }
    }
}

/// User events on the whiteboard surface.
#[derive(Debug, Clone, PartialEq)]
pub enum WhiteboardAction {
    /// Tool button clicked.
    SelectTool(Tool),
    /// Color picker changed.
    SelectColor(String),
    /// Pointer pressed on the surface.
    PointerDown(Point),
    /// Pointer moved over the surface.
    PointerMove(Point),
    /// Pointer released or left the surface.
    PointerUp(Point),
    /// Clear button clicked.
    Clear,
}

impl WhiteboardState {
    /// Binds the surface to its window and starts the render loop.
    pub fn mount(&mut self, window_id: WindowRuntimeId) {
        if self.lifecycle == SurfaceLifecycle::Unmounted {
            self.window_id = Some(window_id);
            self.lifecycle = SurfaceLifecycle::Running;
        }
    }

    /// Pauses or resumes the render loop when the window is minimized or restored.
    pub fn set_visible(&mut self, visible: bool) {
        self.lifecycle = match (self.lifecycle, visible) {
            (SurfaceLifecycle::Running | SurfaceLifecycle::Paused, true) => {
                SurfaceLifecycle::Running
            }
            (SurfaceLifecycle::Running | SurfaceLifecycle::Paused, false) => {
                self.draft = None;
                SurfaceLifecycle::Paused
            }
            (other, _) => other,
        };
    }

    /// Drops every shape and stops the render loop for good.
    pub fn release(&mut self) {
        self.shapes = Vec::new();
        self.draft = None;
        self.lifecycle = SurfaceLifecycle::Released;
    }

    /// Current lifecycle.
    pub fn lifecycle(&self) -> SurfaceLifecycle {
        self.lifecycle
    }

    /// Window the surface is bound to.
    pub fn window_id(&self) -> Option<WindowRuntimeId> {
        self.window_id
    }

    /// Whether frames should be produced.
    pub fn render_loop_active(&self) -> bool {
        self.lifecycle == SurfaceLifecycle::Running
    }

    /// Applies one user action. Drawing input is ignored unless the surface is running.
    pub fn update(&mut self, action: WhiteboardAction) {
        if self.lifecycle == SurfaceLifecycle::Released {
            return;
        }
        match action {
            WhiteboardAction::SelectTool(tool) => self.tool = tool,
            WhiteboardAction::SelectColor(color) => self.color = color,
            WhiteboardAction::Clear => {
                self.shapes.clear();
                self.draft = None;
            }
            WhiteboardAction::PointerDown(at) if self.render_loop_active() => {
                self.draft = Some(Shape::begin(self.tool, at, &self.color));
            }
            WhiteboardAction::PointerMove(to) if self.render_loop_active() => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.extend(to);
                }
            }
            WhiteboardAction::PointerUp(to) => {
                if let Some(mut draft) = self.draft.take() {
                    draft.extend(to);
                    self.shapes.push(draft);
                }
            }
            WhiteboardAction::PointerDown(_) | WhiteboardAction::PointerMove(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn running() -> WhiteboardState {
        let mut board = WhiteboardState::default();
        board.mount(7);
        board
    }

    fn drag(board: &mut WhiteboardState, from: (f64, f64), to: (f64, f64)) {
        board.update(WhiteboardAction::PointerDown(Point::new(from.0, from.1)));
        board.update(WhiteboardAction::PointerMove(Point::new(to.0, to.1)));
        board.update(WhiteboardAction::PointerUp(Point::new(to.0, to.1)));
    }

    #[test]
    fn mount_binds_window_and_starts_loop() {
        let board = running();
        assert_eq!(board.window_id(), Some(7));
        assert!(board.render_loop_active());
    }

    #[test]
    fn pen_stroke_collects_points_and_eraser_paints_background() {
        let mut board = running();
        drag(&mut board, (1.0, 1.0), (4.0, 5.0));
        board.update(WhiteboardAction::SelectTool(Tool::Eraser));
        drag(&mut board, (2.0, 2.0), (3.0, 3.0));

        match &board.shapes[0] {
            Shape::Stroke { points, color, .. } => {
                assert_eq!(points.len(), 3);
                assert_eq!(color, "#000000");
            }
            other => panic!("expected stroke, got {other:?}"),
        }
        assert!(matches!(
            &board.shapes[1],
            Shape::Stroke { color, .. } if color == ERASER_COLOR
        ));
    }

    #[test]
    fn rect_and_circle_follow_the_drag() {
        let mut board = running();
        board.update(WhiteboardAction::SelectColor("#ff0000".to_string()));
        board.update(WhiteboardAction::SelectTool(Tool::Rect));
        drag(&mut board, (10.0, 10.0), (4.0, 30.0));
        board.update(WhiteboardAction::SelectTool(Tool::Circle));
        drag(&mut board, (0.0, 0.0), (3.0, 4.0));

        assert_eq!(
            board.shapes,
            vec![
                Shape::Rect {
                    origin: Point::new(10.0, 10.0),
                    width: -6.0,
                    height: 20.0,
                    color: "#ff0000".to_string(),
                },
                Shape::Circle {
                    center: Point::new(0.0, 0.0),
                    radius: 5.0,
                    color: "#ff0000".to_string(),
                },
            ]
        );
    }

    #[test]
    fn hidden_surface_pauses_and_drops_the_draft() {
        let mut board = running();
        board.update(WhiteboardAction::PointerDown(Point::new(1.0, 1.0)));
        board.set_visible(false);
        assert_eq!(board.lifecycle(), SurfaceLifecycle::Paused);
        assert_eq!(board.draft, None);

        board.update(WhiteboardAction::PointerDown(Point::new(1.0, 1.0)));
        assert_eq!(board.draft, None);
        board.set_visible(true);
        assert!(board.render_loop_active());
    }

    #[test]
    fn release_is_terminal_and_ignores_later_input() {
        let mut board = running();
        drag(&mut board, (1.0, 1.0), (2.0, 2.0));
        board.release();
        board.set_visible(true);
        board.mount(8);
        drag(&mut board, (1.0, 1.0), (2.0, 2.0));
        board.update(WhiteboardAction::SelectTool(Tool::Circle));

        assert_eq!(board.lifecycle(), SurfaceLifecycle::Released);
        assert!(board.shapes.is_empty());
        assert_eq!(board.tool, Tool::Pen);
        assert_eq!(board.window_id(), Some(7));
    }

    #[test]
    fn clear_removes_everything() {
        let mut board = running();
        drag(&mut board, (1.0, 1.0), (2.0, 2.0));
        board.update(WhiteboardAction::Clear);
        assert!(board.shapes.is_empty());
    }
}
