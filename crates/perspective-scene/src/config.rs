use crate::construct::{TetrahedronSide, TriangleSide};
use perspective_core::config::{ConstructionConfig, GridSettings, ProjectionConfig, DEFAULT_HORIZON};
use perspective_core::error::ConfigError;
use perspective_core::geom::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub point_radius: f64,
    pub vanishing_point_radius: f64,
    pub point_hit_tolerance: f64,
    pub horizon_hit_tolerance: f64,
    /// The horizon is kept this far from the top and bottom canvas edges.
    pub horizon_margin: f64,
    pub tetrahedron_edge_threshold: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            point_radius: 6.0,
            vanishing_point_radius: 8.0,
            point_hit_tolerance: 5.0,
            horizon_hit_tolerance: 10.0,
            horizon_margin: 20.0,
            tetrahedron_edge_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub point_a: Vec2,
    pub point_b: Vec2,
    pub vanishing_point_x: f64,
    pub horizon: f64,
    pub triangle_side: TriangleSide,
    pub tetrahedron_side: TetrahedronSide,
    pub show_triangle: bool,
    pub show_tetrahedron: bool,
    pub triangle_draggable: bool,
    pub tetrahedron_draggable: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            point_a: Vec2::new(0.25, 0.67),
            point_b: Vec2::new(0.75, 0.67),
            vanishing_point_x: 0.5,
            horizon: DEFAULT_HORIZON,
            triangle_side: TriangleSide::Bottom,
            tetrahedron_side: TetrahedronSide::Above,
            show_triangle: true,
            show_tetrahedron: true,
            triangle_draggable: true,
            tetrahedron_draggable: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub projection: ProjectionConfig,
    pub construction: ConstructionConfig,
    pub interaction: InteractionConfig,
    pub layout: LayoutConfig,
    pub grid: GridSettings,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection.validate()?;
        self.construction.validate()?;

        let i = &self.interaction;
        for (field, value) in [
            ("point_radius", i.point_radius),
            ("vanishing_point_radius", i.vanishing_point_radius),
            ("point_hit_tolerance", i.point_hit_tolerance),
            ("horizon_hit_tolerance", i.horizon_hit_tolerance),
            ("horizon_margin", i.horizon_margin),
            ("tetrahedron_edge_threshold", i.tetrahedron_edge_threshold),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}
