use crate::arena::PointId;
use crate::construct::{DerivedVertex, TetrahedronSide, TriangleGeometry, TriangleSide};
use crate::drag::{CursorType, DragState, DragUpdate, Draggable, SceneFrame};
use perspective_core::geom::{
    centroid3, circumcircle, distance_to_segment, perpendicular_foot, point_in_triangle, Circle,
    Vec2,
};
use perspective_core::report::{EdgeLengths, SideLengths};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriangleConstruction {
    pub midpoint_ab: Vec2,
    pub altitude_foot: Option<Vec2>,
    pub circumcircle: Option<Circle>,
}

#[derive(Debug, Clone)]
pub struct Triangle {
    a: PointId,
    b: PointId,
    side: TriangleSide,
    geometry: Option<TriangleGeometry>,
    visible: bool,
    draggable: bool,
    state: DragState,
}

impl Triangle {
    pub fn new(a: PointId, b: PointId, side: TriangleSide) -> Self {
        Self {
            a,
            b,
            side,
            geometry: None,
            visible: true,
            draggable: true,
            state: DragState::Idle,
        }
    }

    pub fn base(&self) -> [PointId; 2] {
        [self.a, self.b]
    }

    pub fn side(&self) -> TriangleSide {
        self.side
    }

    pub(crate) fn toggle_side(&mut self) {
        self.side = self.side.toggled();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub(crate) fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    pub fn point_c(&self) -> Option<&DerivedVertex> {
        self.geometry.as_ref().map(|g| &g.c)
    }

    pub fn geometry(&self) -> Option<&TriangleGeometry> {
        self.geometry.as_ref()
    }

    pub(crate) fn set_geometry(&mut self, geometry: Option<TriangleGeometry>) {
        self.geometry = geometry;
    }

    pub fn side_lengths_3d(&self) -> Option<SideLengths> {
        let [a, b, c] = self.geometry?.ground_points();
        Some(SideLengths::from_ground(a, b, c))
    }

    pub fn construction(&self, a: Vec2, b: Vec2) -> Option<TriangleConstruction> {
        let c = self.point_c()?.screen;
        Some(TriangleConstruction {
            midpoint_ab: a.midpoint(b),
            altitude_foot: perpendicular_foot(c, a, b),
            circumcircle: circumcircle(a, b, c),
        })
    }
}

impl Draggable for Triangle {
    fn is_point_in_drag_area(&self, frame: &SceneFrame, pointer: Vec2) -> bool {
        if !self.visible || !self.draggable {
            return false;
        }
        self.point_c()
            .is_some_and(|c| point_in_triangle(pointer, frame.a, frame.b, c.screen))
    }

    fn start_drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> bool {
        if !self.is_point_in_drag_area(frame, pointer) {
            return false;
        }
        let Some(c) = self.point_c() else {
            return false;
        };
        let centroid = centroid3(frame.a, frame.b, c.screen);
        self.state = DragState::Dragging {
            offset: pointer - centroid,
        };
        true
    }

    fn drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> DragUpdate {
        let DragState::Dragging { offset } = self.state else {
            return DragUpdate::Unchanged;
        };
        let Some(c) = self.point_c() else {
            return DragUpdate::Unchanged;
        };
        let centroid = centroid3(frame.a, frame.b, c.screen);
        DragUpdate::Translate {
            points: self.base(),
            delta: pointer - offset - centroid,
        }
    }

    fn stop_drag(&mut self) {
        self.state = DragState::Idle;
    }

    fn drag_state(&self) -> DragState {
        self.state
    }

    fn cursor_type(&self) -> CursorType {
        if self.draggable {
            CursorType::Grab
        } else {
            CursorType::NotAllowed
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tetrahedron {
    side: TetrahedronSide,
    apex: Option<DerivedVertex>,
    visible: bool,
    draggable: bool,
    edge_threshold: f64,
    state: DragState,
}

impl Tetrahedron {
    pub fn new(side: TetrahedronSide, edge_threshold: f64) -> Self {
        Self {
            side,
            apex: None,
            visible: true,
            draggable: true,
            edge_threshold,
            state: DragState::Idle,
        }
    }

    pub fn side(&self) -> TetrahedronSide {
        self.side
    }

    pub(crate) fn toggle_side(&mut self) {
        self.side = self.side.toggled();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub(crate) fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    pub fn point_d(&self) -> Option<&DerivedVertex> {
        self.apex.as_ref()
    }

    pub(crate) fn set_apex(&mut self, apex: Option<DerivedVertex>) {
        self.apex = apex;
    }

    pub fn edge_lengths_3d(&self, base: &TriangleGeometry) -> Option<EdgeLengths> {
        let d = self.apex?.ground;
        let [a, b, c] = base.ground_points();
        Some(EdgeLengths::from_ground(a, b, c, d))
    }

    fn centroid(frame: &SceneFrame) -> Option<Vec2> {
        let c = frame.c?;
        let d = frame.d?;
        Some((frame.a + frame.b + c + d) / 4.0)
    }
}

impl Draggable for Tetrahedron {
    fn is_point_in_drag_area(&self, frame: &SceneFrame, pointer: Vec2) -> bool {
        if !self.visible || !self.draggable {
            return false;
        }
        let (Some(c), Some(d)) = (frame.c, frame.d) else {
            return false;
        };
        [frame.a, frame.b, c]
            .into_iter()
            .any(|end| distance_to_segment(pointer, d, end) <= self.edge_threshold)
    }

    fn start_drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> bool {
        if !self.is_point_in_drag_area(frame, pointer) {
            return false;
        }
        let Some(centroid) = Self::centroid(frame) else {
            return false;
        };
        self.state = DragState::Dragging {
            offset: pointer - centroid,
        };
        true
    }

    fn drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> DragUpdate {
        let DragState::Dragging { offset } = self.state else {
            return DragUpdate::Unchanged;
        };
        let Some(centroid) = Self::centroid(frame) else {
            return DragUpdate::Unchanged;
        };
        DragUpdate::Translate {
            points: frame.base,
            delta: pointer - offset - centroid,
        }
    }

    fn stop_drag(&mut self) {
        self.state = DragState::Idle;
    }

    fn drag_state(&self) -> DragState {
        self.state
    }

    fn cursor_type(&self) -> CursorType {
        if self.draggable {
            CursorType::Grab
        } else {
            CursorType::NotAllowed
        }
    }
}
