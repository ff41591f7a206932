use crate::scene::{Scene, SceneError};
use perspective_core::config::{GridSettings, GRID_SIZE_DEFAULT};
use perspective_core::geom::{CanvasSize, Vec2};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    Resize { width: f64, height: f64 },
    Grid {
        #[serde(default)]
        snap_x: bool,
        #[serde(default)]
        snap_y: bool,
        #[serde(default = "default_grid_size")]
        size: u32,
    },
    ToggleTriangleSide,
    ToggleTetrahedronSide,
    ShowTriangle { visible: bool },
    ShowTetrahedron { visible: bool },
    TriangleDraggable { enabled: bool },
    TetrahedronDraggable { enabled: bool },
}

fn default_grid_size() -> u32 {
    GRID_SIZE_DEFAULT
}

impl Scene {
    /// Only a resize can fail; a rejected resize leaves the scene untouched.
    pub fn apply_event(&mut self, event: &SceneEvent) -> Result<(), SceneError> {
        match *event {
            SceneEvent::PointerDown { x, y } => {
                self.pointer_down(Vec2::new(x, y));
            }
            SceneEvent::PointerMove { x, y } => {
                self.pointer_move(Vec2::new(x, y));
            }
            SceneEvent::PointerUp => self.pointer_up(),
            SceneEvent::PointerLeave => self.pointer_leave(),
            SceneEvent::Resize { width, height } => {
                if let Err(err) = self.resize(CanvasSize::new(width, height)) {
                    warn!(%err, "resize rejected");
                    return Err(err);
                }
            }
            SceneEvent::Grid {
                snap_x,
                snap_y,
                size,
            } => self.set_grid(GridSettings::new(snap_x, snap_y, size)),
            SceneEvent::ToggleTriangleSide => self.toggle_triangle_side(),
            SceneEvent::ToggleTetrahedronSide => self.toggle_tetrahedron_side(),
            SceneEvent::ShowTriangle { visible } => self.set_triangle_visible(visible),
            SceneEvent::ShowTetrahedron { visible } => {
                if visible && !self.triangle().is_visible() {
                    warn!("tetrahedron stays hidden while the triangle is hidden");
                }
                self.set_tetrahedron_visible(visible);
            }
            SceneEvent::TriangleDraggable { enabled } => self.set_triangle_draggable(enabled),
            SceneEvent::TetrahedronDraggable { enabled } => {
                self.set_tetrahedron_draggable(enabled)
            }
        }
        Ok(())
    }
}
