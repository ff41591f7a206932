pub mod arena;
pub mod config;
pub mod construct;
pub mod drag;
pub mod entity;
pub mod events;
pub mod scene;
pub mod shape;
pub mod snapshot;

pub use scene::{DragTarget, Scene, SceneError};
