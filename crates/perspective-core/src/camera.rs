use crate::config::ProjectionConfig;
use crate::error::ProjectionFailure;
use crate::geom::{CanvasSize, Vec2, Vec3, EPSILON};
use serde::Serialize;

// Screen y grows downwards, camera y upwards from the ground plane. The camera
// sits at (vanishing_x, eye_height, focal_length) looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraModel {
    pub camera_x: f64,
    pub camera_y: f64,
    pub camera_z: f64,
    pub eye_level: f64,
    pub ground_plane_y: f64,
    pub focal_length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub world: Vec3,
    pub screen: Option<Vec2>,
}

impl ProjectedPoint {
    pub fn is_visible(&self) -> bool {
        self.screen.is_some()
    }
}

impl CameraModel {
    pub fn from_horizon(horizon_y: f64, vanishing_x: f64, cfg: &ProjectionConfig) -> Self {
        Self {
            camera_x: vanishing_x,
            camera_y: cfg.eye_height,
            camera_z: cfg.focal_length,
            eye_level: horizon_y,
            ground_plane_y: cfg.ground_plane_y,
            focal_length: cfg.focal_length,
        }
    }

    pub fn try_screen_to_ground(&self, screen: Vec2) -> Result<Vec3, ProjectionFailure> {
        let dir_x = screen.x - self.camera_x;
        let dir_y = self.eye_level - screen.y;
        let dir_z = -self.focal_length;

        if dir_y.abs() < EPSILON {
            return Err(ProjectionFailure::RayParallelToGround);
        }

        let t = (self.ground_plane_y - self.camera_y) / dir_y;
        if t <= 0.0 {
            return Err(ProjectionFailure::BehindCamera);
        }

        Ok(Vec3::new(
            self.camera_x + t * dir_x,
            self.ground_plane_y,
            self.camera_z + t * dir_z,
        ))
    }

    pub fn screen_to_ground(&self, screen: Vec2) -> Option<Vec3> {
        self.try_screen_to_ground(screen).ok()
    }

    pub fn try_ground_to_screen(&self, world: Vec3) -> Result<Vec2, ProjectionFailure> {
        let dx = world.x - self.camera_x;
        let dy = world.y - self.camera_y;
        let dz = world.z - self.camera_z;

        if dz >= 0.0 {
            return Err(ProjectionFailure::TargetBehindCameraPlane);
        }

        Ok(Vec2::new(
            self.camera_x + dx * self.focal_length / -dz,
            self.eye_level - dy * self.focal_length / -dz,
        ))
    }

    pub fn ground_to_screen(&self, world: Vec3) -> Option<Vec2> {
        self.try_ground_to_screen(world).ok()
    }

    pub fn is_projection_reasonable(&self, world: Vec3, canvas: CanvasSize, margin: f64) -> bool {
        self.ground_to_screen(world)
            .is_some_and(|p| canvas.bounds().expand(margin).contains(p))
    }

    /// Pixels per world unit at depth `world_z`; zero behind the camera.
    pub fn perspective_scale(&self, world_z: f64) -> f64 {
        let dz = world_z - self.camera_z;
        if dz >= 0.0 {
            return 0.0;
        }
        self.focal_length / -dz
    }

    pub fn world_to_screen_distance(&self, world_distance: f64, world_z: f64) -> f64 {
        world_distance * self.perspective_scale(world_z)
    }

    pub fn screen_to_world_distance(&self, screen_distance: f64, world_z: f64) -> f64 {
        let scale = self.perspective_scale(world_z);
        if scale == 0.0 {
            return 0.0;
        }
        screen_distance / scale
    }

    pub fn project_points(&self, points: &[Vec3]) -> Vec<ProjectedPoint> {
        points
            .iter()
            .map(|&world| ProjectedPoint {
                world,
                screen: self.ground_to_screen(world),
            })
            .collect()
    }
}
