use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EYE_HEIGHT: f64 = 100.0;
pub const DEFAULT_FOCAL_LENGTH: f64 = 500.0;
pub const DEFAULT_MIN_SEPARATION_3D: f64 = 1.0;
pub const DEFAULT_REASONABLENESS_MARGIN: f64 = 200.0;
pub const DEFAULT_HORIZON: f64 = 0.4;

pub const GRID_SIZE_MIN: u32 = 10;
pub const GRID_SIZE_MAX: u32 = 100;
pub const GRID_SIZE_DEFAULT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub eye_height: f64,
    pub focal_length: f64,
    pub ground_plane_y: f64,
    pub reasonableness_margin: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            eye_height: DEFAULT_EYE_HEIGHT,
            focal_length: DEFAULT_FOCAL_LENGTH,
            ground_plane_y: 0.0,
            reasonableness_margin: DEFAULT_REASONABLENESS_MARGIN,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("eye_height", self.eye_height)?;
        positive("focal_length", self.focal_length)?;
        finite("ground_plane_y", self.ground_plane_y)?;
        non_negative("reasonableness_margin", self.reasonableness_margin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    /// Minimum ground-plane separation of A and B below which no triangle is built.
    pub min_separation_3d: f64,
    pub vertex_inset: f64,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            min_separation_3d: DEFAULT_MIN_SEPARATION_3D,
            vertex_inset: 6.0,
        }
    }
}

impl ConstructionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("min_separation_3d", self.min_separation_3d)?;
        non_negative("vertex_inset", self.vertex_inset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub snap_x: bool,
    pub snap_y: bool,
    pub size: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            snap_x: false,
            snap_y: false,
            size: GRID_SIZE_DEFAULT,
        }
    }
}

impl GridSettings {
    pub fn new(snap_x: bool, snap_y: bool, size: u32) -> Self {
        Self {
            snap_x,
            snap_y,
            size: size.clamp(GRID_SIZE_MIN, GRID_SIZE_MAX),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.snap_x, self.snap_y, self.size)
    }

    pub fn snap_x(&self, x: f64) -> f64 {
        if self.snap_x {
            crate::geom::snap(x, f64::from(self.size))
        } else {
            x
        }
    }

    pub fn snap_y(&self, y: f64) -> f64 {
        if self.snap_y {
            crate::geom::snap(y, f64::from(self.size))
        } else {
            y
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
