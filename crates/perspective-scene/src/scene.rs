use crate::arena::{PointArena, PointId};
use crate::config::SceneConfig;
use crate::construct::{derive_tetrahedron, derive_triangle, TriangleSide};
use crate::drag::{CursorType, DragUpdate, Draggable, SceneFrame};
use crate::entity::{FreePoint, HorizonLine, VanishingPoint};
use crate::shape::{Tetrahedron, Triangle, TriangleConstruction};
use perspective_core::camera::CameraModel;
use perspective_core::config::GridSettings;
use perspective_core::error::ConfigError;
use perspective_core::geom::{centroid3_3d, CanvasSize, Vec2, Vec3};
use perspective_core::report::{EdgeLengths, SideLengths};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

const FIT_TOLERANCE: f64 = 1e-6;
const FIT_STEPS: usize = 40;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragTarget {
    Point(PointId),
    VanishingPoint,
    Triangle,
    Tetrahedron,
    Horizon,
}

#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    canvas: CanvasSize,
    grid: GridSettings,
    points: PointArena,
    a: PointId,
    b: PointId,
    vanishing_point: VanishingPoint,
    horizon: HorizonLine,
    camera: CameraModel,
    triangle: Triangle,
    tetrahedron: Tetrahedron,
    active: Option<DragTarget>,
}

impl Scene {
    pub fn new(config: SceneConfig, canvas: CanvasSize) -> Result<Self, SceneError> {
        config.validate()?;
        check_canvas(canvas)?;

        let i = &config.interaction;
        let layout = &config.layout;

        let mut points = PointArena::new();
        let a = points.insert(FreePoint::new(
            "A",
            layout.point_a,
            i.point_radius,
            i.point_hit_tolerance,
        ));
        let b = points.insert(FreePoint::new(
            "B",
            layout.point_b,
            i.point_radius,
            i.point_hit_tolerance,
        ));

        let vanishing_point = VanishingPoint::new(
            layout.vanishing_point_x,
            layout.horizon,
            i.vanishing_point_radius,
            i.point_hit_tolerance,
        );
        let horizon = HorizonLine::new(layout.horizon, i.horizon_hit_tolerance, i.horizon_margin);

        let mut triangle = Triangle::new(a, b, layout.triangle_side);
        triangle.set_visible(layout.show_triangle);
        triangle.set_draggable(layout.triangle_draggable);

        let mut tetrahedron = Tetrahedron::new(layout.tetrahedron_side, i.tetrahedron_edge_threshold);
        tetrahedron.set_visible(layout.show_tetrahedron && layout.show_triangle);
        tetrahedron.set_draggable(layout.tetrahedron_draggable);

        let camera = CameraModel::from_horizon(0.0, 0.0, &config.projection);
        let grid = config.grid.normalized();

        let mut scene = Self {
            config,
            canvas,
            grid,
            points,
            a,
            b,
            vanishing_point,
            horizon,
            camera,
            triangle,
            tetrahedron,
            active: None,
        };
        scene.layout_for_canvas();
        scene.recompute_dependents();
        Ok(scene)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    pub fn points(&self) -> &PointArena {
        &self.points
    }

    pub fn point_a(&self) -> PointId {
        self.a
    }

    pub fn point_b(&self) -> PointId {
        self.b
    }

    pub fn point(&self, id: PointId) -> Option<&FreePoint> {
        self.points.get(id)
    }

    pub fn vanishing_point(&self) -> &VanishingPoint {
        &self.vanishing_point
    }

    pub fn horizon(&self) -> &HorizonLine {
        &self.horizon
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    pub fn tetrahedron(&self) -> &Tetrahedron {
        &self.tetrahedron
    }

    pub fn active_drag(&self) -> Option<DragTarget> {
        self.active
    }

    pub fn resize(&mut self, canvas: CanvasSize) -> Result<(), SceneError> {
        check_canvas(canvas)?;
        self.canvas = canvas;
        self.layout_for_canvas();
        self.recompute_dependents();
        Ok(())
    }

    fn layout_for_canvas(&mut self) {
        let canvas = self.canvas;
        for point in self.points.iter_mut() {
            point.update_absolute(canvas);
        }
        self.horizon.update_absolute(canvas.height);
        self.vanishing_point
            .update_absolute(canvas, self.horizon.y_absolute());
    }

    pub fn set_grid(&mut self, grid: GridSettings) {
        self.grid = grid.normalized();
    }

    /// Camera, then C, then D. Idempotent: the outputs depend only on the
    /// current independent state.
    pub fn recompute_dependents(&mut self) {
        self.camera = CameraModel::from_horizon(
            self.horizon.y_absolute(),
            self.vanishing_point.screen().x,
            &self.config.projection,
        );
        trace!(
            eye_level = self.camera.eye_level,
            camera_x = self.camera.camera_x,
            "recomputing dependents"
        );
        self.recompute_triangle();
        self.recompute_tetrahedron();
    }

    fn recompute_triangle(&mut self) {
        if !self.triangle.is_visible() {
            self.triangle.set_geometry(None);
            return;
        }
        let result = derive_triangle(
            &self.camera,
            self.points[self.a].screen(),
            self.points[self.b].screen(),
            self.triangle.side(),
            self.canvas,
            &self.config.projection,
            &self.config.construction,
        );
        let geometry = match result {
            Ok(geometry) => Some(geometry),
            Err(err) => {
                debug!(%err, "triangle apex cleared");
                None
            }
        };
        self.triangle.set_geometry(geometry);
    }

    fn recompute_tetrahedron(&mut self) {
        let base = match self.triangle.geometry() {
            Some(base) if self.tetrahedron.is_visible() => *base,
            _ => {
                self.tetrahedron.set_apex(None);
                return;
            }
        };
        let apex = match derive_tetrahedron(
            &self.camera,
            &base,
            self.tetrahedron.side(),
            self.canvas,
            &self.config.projection,
            &self.config.construction,
        ) {
            Ok(apex) => Some(apex),
            Err(err) => {
                debug!(%err, "tetrahedron apex cleared");
                None
            }
        };
        self.tetrahedron.set_apex(apex);
    }

    pub fn toggle_triangle_side(&mut self) {
        self.triangle.toggle_side();
        self.recompute_triangle();
        self.recompute_tetrahedron();
    }

    pub fn toggle_tetrahedron_side(&mut self) {
        self.tetrahedron.toggle_side();
        self.recompute_tetrahedron();
    }

    pub fn set_triangle_side(&mut self, side: TriangleSide) {
        if self.triangle.side() != side {
            self.toggle_triangle_side();
        }
    }

    pub fn set_triangle_visible(&mut self, visible: bool) {
        self.triangle.set_visible(visible);
        if !visible {
            self.tetrahedron.set_visible(false);
            self.cancel_drag_of(&[DragTarget::Triangle, DragTarget::Tetrahedron]);
        }
        self.recompute_triangle();
        self.recompute_tetrahedron();
    }

    /// Ignored (stays hidden) while the triangle is hidden.
    pub fn set_tetrahedron_visible(&mut self, visible: bool) {
        self.tetrahedron
            .set_visible(visible && self.triangle.is_visible());
        if !self.tetrahedron.is_visible() {
            self.cancel_drag_of(&[DragTarget::Tetrahedron]);
        }
        self.recompute_tetrahedron();
    }

    pub fn set_triangle_draggable(&mut self, draggable: bool) {
        self.triangle.set_draggable(draggable);
    }

    pub fn set_tetrahedron_draggable(&mut self, draggable: bool) {
        self.tetrahedron.set_draggable(draggable);
    }

    pub fn move_point(&mut self, id: PointId, target: Vec2) {
        let (canvas, grid) = (self.canvas, self.grid);
        if let Some(point) = self.points.get_mut(id) {
            point.set_position(target, canvas, &grid);
            self.recompute_dependents();
        }
    }

    pub fn move_vanishing_point(&mut self, x: f64) {
        let y = self.horizon.y_absolute();
        self.vanishing_point
            .set_position(Vec2::new(x, y), y, self.canvas, &self.grid);
        self.recompute_dependents();
    }

    pub fn move_horizon(&mut self, y: f64) {
        self.horizon.set_position(y, self.canvas.height, &self.grid);
        self.vanishing_point
            .pin_to_horizon(self.horizon.y_absolute(), self.canvas);
        self.recompute_dependents();
    }

    pub fn hit_order(&self) -> [DragTarget; 6] {
        [
            DragTarget::Point(self.a),
            DragTarget::Point(self.b),
            DragTarget::VanishingPoint,
            DragTarget::Triangle,
            DragTarget::Tetrahedron,
            DragTarget::Horizon,
        ]
    }

    pub fn frame(&self) -> SceneFrame {
        SceneFrame {
            canvas: self.canvas,
            grid: self.grid,
            horizon_y: self.horizon.y_absolute(),
            base: self.triangle.base(),
            a: self.points[self.a].screen(),
            b: self.points[self.b].screen(),
            c: self.triangle.point_c().map(|c| c.screen),
            d: self.tetrahedron.point_d().map(|d| d.screen),
        }
    }

    fn draggable(&self, target: DragTarget) -> &dyn Draggable {
        match target {
            DragTarget::Point(id) => &self.points[id],
            DragTarget::VanishingPoint => &self.vanishing_point,
            DragTarget::Triangle => &self.triangle,
            DragTarget::Tetrahedron => &self.tetrahedron,
            DragTarget::Horizon => &self.horizon,
        }
    }

    fn draggable_mut(&mut self, target: DragTarget) -> &mut dyn Draggable {
        match target {
            DragTarget::Point(id) => &mut self.points[id],
            DragTarget::VanishingPoint => &mut self.vanishing_point,
            DragTarget::Triangle => &mut self.triangle,
            DragTarget::Tetrahedron => &mut self.tetrahedron,
            DragTarget::Horizon => &mut self.horizon,
        }
    }

    pub fn hit_test(&self, pointer: Vec2) -> Option<DragTarget> {
        let frame = self.frame();
        self.hit_order()
            .into_iter()
            .find(|&t| self.draggable(t).is_point_in_drag_area(&frame, pointer))
    }

    pub fn pointer_down(&mut self, pointer: Vec2) -> Option<DragTarget> {
        self.end_drag();
        let frame = self.frame();
        for target in self.hit_order() {
            if self.draggable_mut(target).start_drag(&frame, pointer) {
                trace!(?target, x = pointer.x, y = pointer.y, "drag claimed");
                self.active = Some(target);
                return Some(target);
            }
        }
        None
    }

    pub fn pointer_move(&mut self, pointer: Vec2) -> bool {
        let Some(target) = self.active else {
            return false;
        };
        let frame = self.frame();
        let update = self.draggable_mut(target).drag(&frame, pointer);
        self.apply_update(update);
        self.recompute_dependents();
        true
    }

    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    pub fn pointer_leave(&mut self) {
        self.end_drag();
    }

    fn end_drag(&mut self) {
        if let Some(target) = self.active.take() {
            self.draggable_mut(target).stop_drag();
            trace!(?target, "drag ended");
        }
    }

    fn cancel_drag_of(&mut self, targets: &[DragTarget]) {
        if self.active.is_some_and(|t| targets.contains(&t)) {
            self.end_drag();
        }
    }

    fn apply_update(&mut self, update: DragUpdate) {
        match update {
            DragUpdate::Unchanged | DragUpdate::Moved => {}
            DragUpdate::HorizonMoved => {
                self.vanishing_point
                    .pin_to_horizon(self.horizon.y_absolute(), self.canvas);
            }
            DragUpdate::Translate { points, delta } => self.translate_on_ground(points, delta),
        }
    }

    /// Moves `points` rigidly across the ground plane by the displacement
    /// that carries the base centroid's ground point along `delta` on screen.
    /// Nothing moves when the shifted centroid leaves the ground.
    fn translate_on_ground(&mut self, points: [PointId; 2], delta: Vec2) {
        let Some(base) = self.triangle.geometry() else {
            return;
        };
        let [ga, gb, gc] = base.ground_points();
        let anchor = centroid3_3d(ga, gb, gc);
        let Some(target) = self
            .camera
            .ground_to_screen(anchor)
            .and_then(|s| self.camera.screen_to_ground(s + delta))
        else {
            trace!(dx = delta.x, dy = delta.y, "translation leaves the ground plane");
            return;
        };

        let Some(moved) = self.fit_shift(points, [ga, gb], target - anchor) else {
            trace!(dx = delta.x, dy = delta.y, "base is against the canvas edge");
            return;
        };

        let (canvas, grid) = (self.canvas, self.grid);
        for (id, screen) in points.into_iter().zip(moved) {
            self.points[id].set_position(screen, canvas, &grid);
        }
    }

    /// Screen positions for `points` after shifting their ground points by the
    /// largest fraction of `shift` that keeps both inside the canvas unclamped.
    fn fit_shift(&self, points: [PointId; 2], ground: [Vec3; 2], shift: Vec3) -> Option<[Vec2; 2]> {
        let place = |t: f64| -> Option<[Vec2; 2]> {
            let mut moved = [Vec2::ZERO; 2];
            for ((slot, id), g) in moved.iter_mut().zip(points).zip(ground) {
                let screen = self.camera.ground_to_screen(g + shift * t)?;
                let inside = self.canvas.clamp_inside(screen, self.points[id].radius());
                if screen.distance(inside) > FIT_TOLERANCE {
                    return None;
                }
                *slot = screen;
            }
            Some(moved)
        };

        if let Some(moved) = place(1.0) {
            return Some(moved);
        }
        // Lines stay lines under projection, so the valid fractions form one interval from 0.
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut best = None;
        for _ in 0..FIT_STEPS {
            let mid = 0.5 * (lo + hi);
            match place(mid) {
                Some(moved) => {
                    best = Some(moved);
                    lo = mid;
                }
                None => hi = mid,
            }
        }
        best
    }

    pub fn cursor_at(&self, pointer: Vec2) -> CursorType {
        if self.active.is_some() {
            return CursorType::Grabbing;
        }
        let frame = self.frame();
        let [a, b, vp, triangle, tetrahedron, horizon] = self.hit_order();
        for target in [a, b, vp, triangle, tetrahedron] {
            let draggable = self.draggable(target);
            if draggable.is_point_in_drag_area(&frame, pointer) {
                return draggable.cursor_type();
            }
        }
        if self.is_over_derived_vertex(pointer) {
            return CursorType::NotAllowed;
        }
        let horizon = self.draggable(horizon);
        if horizon.is_point_in_drag_area(&frame, pointer) {
            return horizon.cursor_type();
        }
        CursorType::Default
    }

    fn is_over_derived_vertex(&self, pointer: Vec2) -> bool {
        let reach = self.config.interaction.point_radius + self.config.interaction.point_hit_tolerance;
        self.triangle
            .point_c()
            .into_iter()
            .chain(self.tetrahedron.point_d())
            .any(|v| v.screen.distance(pointer) <= reach)
    }

    pub fn screen_side_lengths(&self) -> Option<SideLengths> {
        let c = self.triangle.point_c()?.screen;
        Some(SideLengths::from_screen(
            self.points[self.a].screen(),
            self.points[self.b].screen(),
            c,
        ))
    }

    pub fn side_lengths_3d(&self) -> Option<SideLengths> {
        self.triangle.side_lengths_3d()
    }

    pub fn edge_lengths_3d(&self) -> Option<EdgeLengths> {
        self.tetrahedron.edge_lengths_3d(self.triangle.geometry()?)
    }

    pub fn triangle_construction(&self) -> Option<TriangleConstruction> {
        self.triangle
            .construction(self.points[self.a].screen(), self.points[self.b].screen())
    }
}

fn check_canvas(canvas: CanvasSize) -> Result<(), SceneError> {
    if canvas.is_valid() {
        Ok(())
    } else {
        Err(SceneError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        })
    }
}
