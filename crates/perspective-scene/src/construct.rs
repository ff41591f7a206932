use nalgebra::{Point3, Vector2, Vector3};
use perspective_core::camera::CameraModel;
use perspective_core::config::{ConstructionConfig, ProjectionConfig};
use perspective_core::error::{DegenerateGeometry, GeometryError};
use perspective_core::geom::{CanvasSize, Vec2, Vec3, EPSILON};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleSide {
    Top,
    Bottom,
}

impl TriangleSide {
    pub fn toggled(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApexSide {
    Front,
    Back,
}

impl From<TriangleSide> for ApexSide {
    fn from(side: TriangleSide) -> Self {
        match side {
            TriangleSide::Top => Self::Front,
            TriangleSide::Bottom => Self::Back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TetrahedronSide {
    Above,
    Below,
}

impl TetrahedronSide {
    pub fn toggled(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Above => 1.0,
            Self::Below => -1.0,
        }
    }
}

/// `screen` may differ from the exact projection of `ground` when the vertex
/// had to be clamped inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedVertex {
    pub screen: Vec2,
    pub relative: Vec2,
    pub ground: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriangleGeometry {
    pub c: DerivedVertex,
    pub ground_a: Vec3,
    pub ground_b: Vec3,
}

impl TriangleGeometry {
    pub fn ground_points(&self) -> [Vec3; 3] {
        [self.ground_a, self.ground_b, self.c.ground]
    }
}

fn to_point(p: Vec3) -> Point3<f64> {
    Point3::new(p.x, p.y, p.z)
}

fn from_point(p: Point3<f64>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Returns `None` when AB has no length in the XZ plane.
pub fn equilateral_apex_3d(a: Vec3, b: Vec3, side: ApexSide) -> Option<Vec3> {
    let pa = to_point(a);
    let pb = to_point(b);
    let ab = pb - pa;

    let ground_len = Vector2::new(ab.x, ab.z).norm();
    if ground_len < EPSILON {
        return None;
    }

    let mut perp = Vector3::new(-ab.z, 0.0, ab.x) / ground_len;
    if side == ApexSide::Back {
        perp = -perp;
    }

    let height = 3.0_f64.sqrt() / 2.0 * ground_len;
    let apex = nalgebra::center(&pa, &pb) + perp * height;
    Some(Vec3::new(apex.x, a.y, apex.z))
}

pub fn tetrahedron_apex_3d(a: Vec3, b: Vec3, c: Vec3, side: TetrahedronSide) -> Vec3 {
    let pa = to_point(a);
    let pb = to_point(b);
    let pc = to_point(c);

    let centroid = Point3::from((pa.coords + pb.coords + pc.coords) / 3.0);
    let edge = (pb - pa).norm();
    let height = edge * (2.0_f64 / 3.0).sqrt();

    from_point(centroid + Vector3::y() * (height * side.sign()))
}

fn place_vertex(
    camera: &CameraModel,
    ground: Vec3,
    canvas: CanvasSize,
    projection: &ProjectionConfig,
    construction: &ConstructionConfig,
) -> Result<DerivedVertex, GeometryError> {
    let screen = camera.try_ground_to_screen(ground)?;
    if !camera.is_projection_reasonable(ground, canvas, projection.reasonableness_margin) {
        return Err(GeometryError::OutOfReasonableBounds);
    }
    // Lossy near the edges: the clamped screen position no longer matches `ground`.
    let screen = canvas.clamp_inside(screen, construction.vertex_inset);
    Ok(DerivedVertex {
        screen,
        relative: screen.relative_to(canvas),
        ground,
    })
}

pub fn derive_triangle(
    camera: &CameraModel,
    a: Vec2,
    b: Vec2,
    side: TriangleSide,
    canvas: CanvasSize,
    projection: &ProjectionConfig,
    construction: &ConstructionConfig,
) -> Result<TriangleGeometry, GeometryError> {
    let ground_a = camera.try_screen_to_ground(a)?;
    let ground_b = camera.try_screen_to_ground(b)?;

    if ground_a.ground_distance(ground_b) < construction.min_separation_3d {
        return Err(DegenerateGeometry::PointsTooClose.into());
    }

    let ground_c = equilateral_apex_3d(ground_a, ground_b, side.into())
        .ok_or(DegenerateGeometry::ZeroLengthBase)?;
    let c = place_vertex(camera, ground_c, canvas, projection, construction)?;

    Ok(TriangleGeometry {
        c,
        ground_a,
        ground_b,
    })
}

pub fn derive_tetrahedron(
    camera: &CameraModel,
    base: &TriangleGeometry,
    side: TetrahedronSide,
    canvas: CanvasSize,
    projection: &ProjectionConfig,
    construction: &ConstructionConfig,
) -> Result<DerivedVertex, GeometryError> {
    let [a, b, c] = base.ground_points();
    let ground_d = tetrahedron_apex_3d(a, b, c, side);
    place_vertex(camera, ground_d, canvas, projection, construction)
}
