use crate::drag::{CursorType, DragState, DragUpdate, Draggable, SceneFrame};
use perspective_core::config::GridSettings;
use perspective_core::geom::{clamp_range, CanvasSize, Vec2};

/// A point the user drags directly. The relative position is canonical; the
/// screen position is re-derived from it whenever the canvas changes.
#[derive(Debug, Clone)]
pub struct FreePoint {
    label: String,
    relative: Vec2,
    screen: Vec2,
    radius: f64,
    hit_tolerance: f64,
    state: DragState,
}

impl FreePoint {
    pub fn new(label: impl Into<String>, relative: Vec2, radius: f64, hit_tolerance: f64) -> Self {
        Self {
            label: label.into(),
            relative,
            screen: Vec2::ZERO,
            radius,
            hit_tolerance,
            state: DragState::Idle,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    pub fn relative(&self) -> Vec2 {
        self.relative
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn update_absolute(&mut self, canvas: CanvasSize) {
        self.screen = self.relative.scale_by(canvas);
    }

    pub fn set_position(&mut self, target: Vec2, canvas: CanvasSize, grid: &GridSettings) {
        let x = grid.snap_x(target.x);
        let y = grid.snap_y(target.y);
        self.screen = Vec2::new(
            clamp_range(x, self.radius, canvas.width - self.radius),
            clamp_range(y, self.radius, canvas.height - self.radius),
        );
        self.relative = self.screen.relative_to(canvas);
    }

    pub fn contains(&self, pointer: Vec2) -> bool {
        pointer.distance(self.screen) <= self.radius + self.hit_tolerance
    }
}

impl Draggable for FreePoint {
    fn is_point_in_drag_area(&self, _frame: &SceneFrame, pointer: Vec2) -> bool {
        self.contains(pointer)
    }

    fn start_drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> bool {
        if !self.is_point_in_drag_area(frame, pointer) {
            return false;
        }
        self.state = DragState::Dragging {
            offset: pointer - self.screen,
        };
        true
    }

    fn drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> DragUpdate {
        let DragState::Dragging { offset } = self.state else {
            return DragUpdate::Unchanged;
        };
        self.set_position(pointer - offset, frame.canvas, &frame.grid);
        DragUpdate::Moved
    }

    fn stop_drag(&mut self) {
        self.state = DragState::Idle;
    }

    fn drag_state(&self) -> DragState {
        self.state
    }

    fn cursor_type(&self) -> CursorType {
        CursorType::Grab
    }
}

#[derive(Debug, Clone)]
pub struct VanishingPoint {
    point: FreePoint,
}

impl VanishingPoint {
    pub fn new(relative_x: f64, horizon: f64, radius: f64, hit_tolerance: f64) -> Self {
        Self {
            point: FreePoint::new("VP", Vec2::new(relative_x, horizon), radius, hit_tolerance),
        }
    }

    pub fn screen(&self) -> Vec2 {
        self.point.screen
    }

    pub fn relative(&self) -> Vec2 {
        self.point.relative
    }

    pub fn radius(&self) -> f64 {
        self.point.radius
    }

    pub fn update_absolute(&mut self, canvas: CanvasSize, horizon_y: f64) {
        self.point.update_absolute(canvas);
        self.pin_to_horizon(horizon_y, canvas);
    }

    pub fn pin_to_horizon(&mut self, horizon_y: f64, canvas: CanvasSize) {
        self.point.screen.y = horizon_y;
        self.point.relative = self.point.screen.relative_to(canvas);
    }

    /// Only X follows `target`; Y is always the horizon's.
    pub fn set_position(&mut self, target: Vec2, horizon_y: f64, canvas: CanvasSize, grid: &GridSettings) {
        let x = grid.snap_x(target.x);
        let radius = self.point.radius;
        self.point.screen = Vec2::new(clamp_range(x, radius, canvas.width - radius), horizon_y);
        self.point.relative = self.point.screen.relative_to(canvas);
    }
}

impl Draggable for VanishingPoint {
    fn is_point_in_drag_area(&self, frame: &SceneFrame, pointer: Vec2) -> bool {
        self.point.is_point_in_drag_area(frame, pointer)
    }

    fn start_drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> bool {
        self.point.start_drag(frame, pointer)
    }

    fn drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> DragUpdate {
        let DragState::Dragging { offset } = self.point.state else {
            return DragUpdate::Unchanged;
        };
        self.set_position(pointer - offset, frame.horizon_y, frame.canvas, &frame.grid);
        DragUpdate::Moved
    }

    fn stop_drag(&mut self) {
        self.point.stop_drag();
    }

    fn drag_state(&self) -> DragState {
        self.point.state
    }

    fn cursor_type(&self) -> CursorType {
        CursorType::Grab
    }
}

#[derive(Debug, Clone)]
pub struct HorizonLine {
    y_relative: f64,
    y_absolute: f64,
    hit_tolerance: f64,
    margin: f64,
    state: DragState,
}

impl HorizonLine {
    pub fn new(y_relative: f64, hit_tolerance: f64, margin: f64) -> Self {
        Self {
            y_relative,
            y_absolute: 0.0,
            hit_tolerance,
            margin,
            state: DragState::Idle,
        }
    }

    pub fn y_relative(&self) -> f64 {
        self.y_relative
    }

    pub fn y_absolute(&self) -> f64 {
        self.y_absolute
    }

    pub fn update_absolute(&mut self, canvas_height: f64) {
        self.y_absolute = self.clamp(self.y_relative * canvas_height, canvas_height);
    }

    pub fn set_position(&mut self, y: f64, canvas_height: f64, grid: &GridSettings) {
        self.y_absolute = self.clamp(grid.snap_y(y), canvas_height);
        self.y_relative = self.y_absolute / canvas_height;
    }

    fn clamp(&self, y: f64, canvas_height: f64) -> f64 {
        clamp_range(y, self.margin, canvas_height - self.margin)
    }
}

impl Draggable for HorizonLine {
    fn is_point_in_drag_area(&self, _frame: &SceneFrame, pointer: Vec2) -> bool {
        (pointer.y - self.y_absolute).abs() <= self.hit_tolerance
    }

    fn start_drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> bool {
        if !self.is_point_in_drag_area(frame, pointer) {
            return false;
        }
        self.state = DragState::Dragging {
            offset: Vec2::new(0.0, pointer.y - self.y_absolute),
        };
        true
    }

    fn drag(&mut self, frame: &SceneFrame, pointer: Vec2) -> DragUpdate {
        let DragState::Dragging { offset } = self.state else {
            return DragUpdate::Unchanged;
        };
        self.set_position(pointer.y - offset.y, frame.canvas.height, &frame.grid);
        DragUpdate::HorizonMoved
    }

    fn stop_drag(&mut self) {
        self.state = DragState::Idle;
    }

    fn drag_state(&self) -> DragState {
        self.state
    }

    fn cursor_type(&self) -> CursorType {
        CursorType::NsResize
    }
}
