use crate::entity::FreePoint;
use serde::Serialize;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PointId(usize);

#[derive(Debug, Clone, Default)]
pub struct PointArena {
    points: Vec<FreePoint>,
}

impl PointArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: FreePoint) -> PointId {
        self.points.push(point);
        PointId(self.points.len() - 1)
    }

    pub fn get(&self, id: PointId) -> Option<&FreePoint> {
        self.points.get(id.0)
    }

    pub fn get_mut(&mut self, id: PointId) -> Option<&mut FreePoint> {
        self.points.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointId, &FreePoint)> {
        self.points.iter().enumerate().map(|(i, p)| (PointId(i), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FreePoint> {
        self.points.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Index<PointId> for PointArena {
    type Output = FreePoint;

    fn index(&self, id: PointId) -> &FreePoint {
        &self.points[id.0]
    }
}

impl IndexMut<PointId> for PointArena {
    fn index_mut(&mut self, id: PointId) -> &mut FreePoint {
        &mut self.points[id.0]
    }
}
