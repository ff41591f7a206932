use crate::arena::PointId;
use perspective_core::config::GridSettings;
use perspective_core::geom::{CanvasSize, Vec2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `offset` is the pointer position minus the entity's reference point
    /// (its position or its centroid) at the moment the drag was claimed.
    Dragging { offset: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorType {
    Default,
    Grab,
    Grabbing,
    NsResize,
    NotAllowed,
}

#[derive(Debug, Clone, Copy)]
pub struct SceneFrame {
    pub canvas: CanvasSize,
    pub grid: GridSettings,
    pub horizon_y: f64,
    pub base: [PointId; 2],
    pub a: Vec2,
    pub b: Vec2,
    pub c: Option<Vec2>,
    pub d: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    Unchanged,
    Moved,
    /// The horizon moved; the vanishing point must follow it.
    HorizonMoved,
    /// Carry the given free points along with a screen-space move of the
    /// shape's reference point by `delta`.
    Translate { points: [PointId; 2], delta: Vec2 },
}

pub trait Draggable {
    fn is_point_in_drag_area(&self, frame: &SceneFrame, pointer: Vec2) -> bool;

    fn start_drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> bool;

    fn drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> DragUpdate;

    fn stop_drag(&mut self);

    fn drag_state(&self) -> DragState;

    fn cursor_type(&self) -> CursorType;

    fn is_dragging(&self) -> bool {
        matches!(self.drag_state(), DragState::Dragging { .. })
    }
}
