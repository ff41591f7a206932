use crate::construct::{DerivedVertex, TetrahedronSide, TriangleSide};
use crate::scene::{DragTarget, Scene};
use crate::shape::TriangleConstruction;
use perspective_core::camera::CameraModel;
use perspective_core::config::GridSettings;
use perspective_core::geom::{CanvasSize, Vec2};
use perspective_core::report::{EdgeLengths, SideLengths};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSnapshot {
    pub label: String,
    pub screen: Vec2,
    pub relative: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriangleSnapshot {
    pub side: TriangleSide,
    pub visible: bool,
    pub draggable: bool,
    pub c: Option<DerivedVertex>,
    pub screen_lengths: Option<SideLengths>,
    pub lengths_3d: Option<SideLengths>,
    pub construction: Option<TriangleConstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TetrahedronSnapshot {
    pub side: TetrahedronSide,
    pub visible: bool,
    pub draggable: bool,
    pub d: Option<DerivedVertex>,
    pub lengths_3d: Option<EdgeLengths>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub canvas: CanvasSize,
    pub grid: GridSettings,
    pub horizon_y: f64,
    pub horizon_relative: f64,
    pub vanishing_point: Vec2,
    pub camera: CameraModel,
    pub points: Vec<PointSnapshot>,
    pub triangle: TriangleSnapshot,
    pub tetrahedron: TetrahedronSnapshot,
    pub active_drag: Option<DragTarget>,
}

impl Scene {
    pub fn snapshot(&self) -> SceneSnapshot {
        let points = self
            .points()
            .iter()
            .map(|(_, p)| PointSnapshot {
                label: p.label().to_owned(),
                screen: p.screen(),
                relative: p.relative(),
            })
            .collect();

        let triangle = self.triangle();
        let tetrahedron = self.tetrahedron();

        SceneSnapshot {
            canvas: self.canvas(),
            grid: self.grid(),
            horizon_y: self.horizon().y_absolute(),
            horizon_relative: self.horizon().y_relative(),
            vanishing_point: self.vanishing_point().screen(),
            camera: *self.camera(),
            points,
            triangle: TriangleSnapshot {
                side: triangle.side(),
                visible: triangle.is_visible(),
                draggable: triangle.is_draggable(),
                c: triangle.point_c().copied(),
                screen_lengths: self.screen_side_lengths(),
                lengths_3d: self.side_lengths_3d(),
                construction: self.triangle_construction(),
            },
            tetrahedron: TetrahedronSnapshot {
                side: tetrahedron.side(),
                visible: tetrahedron.is_visible(),
                draggable: tetrahedron.is_draggable(),
                d: tetrahedron.point_d().copied(),
                lengths_3d: self.edge_lengths_3d(),
            },
            active_drag: self.active_drag(),
        }
    }
}
