use crate::geom::{Vec2, Vec3};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

impl Distance {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideLengths {
    pub ab: Distance,
    pub bc: Distance,
    pub ca: Distance,
}

impl SideLengths {
    pub fn from_screen(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self {
            ab: Distance(a.distance(b)),
            bc: Distance(b.distance(c)),
            ca: Distance(c.distance(a)),
        }
    }

    pub fn from_ground(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            ab: Distance(a.distance(b)),
            bc: Distance(b.distance(c)),
            ca: Distance(c.distance(a)),
        }
    }
}

impl fmt::Display for SideLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AB={}, BC={}, CA={}", self.ab, self.bc, self.ca)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeLengths {
    pub ab: Distance,
    pub bc: Distance,
    pub ca: Distance,
    pub da: Distance,
    pub db: Distance,
    pub dc: Distance,
}

impl EdgeLengths {
    pub fn from_ground(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        let base = SideLengths::from_ground(a, b, c);
        Self {
            ab: base.ab,
            bc: base.bc,
            ca: base.ca,
            da: Distance(d.distance(a)),
            db: Distance(d.distance(b)),
            dc: Distance(d.distance(c)),
        }
    }

    pub fn all(&self) -> [Distance; 6] {
        [self.ab, self.bc, self.ca, self.da, self.db, self.dc]
    }
}

impl fmt::Display for EdgeLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AB={}, BC={}, CA={}, DA={}, DB={}, DC={}",
            self.ab, self.bc, self.ca, self.da, self.db, self.dc
        )
    }
}
