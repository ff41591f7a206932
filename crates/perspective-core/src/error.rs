use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionFailure {
    #[error("ray through the screen point is parallel to the ground plane")]
    RayParallelToGround,
    #[error("ray meets the ground plane behind the camera")]
    BehindCamera,
    #[error("world point lies behind the camera plane")]
    TargetBehindCameraPlane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateGeometry {
    #[error("base points are too close on the ground plane")]
    PointsTooClose,
    #[error("base edge has no ground-plane length")]
    ZeroLengthBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum GeometryError {
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionFailure),
    #[error("degenerate geometry: {0}")]
    Degenerate(#[from] DegenerateGeometry),
    #[error("projected point falls outside the reasonable screen bounds")]
    OutOfReasonableBounds,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}
