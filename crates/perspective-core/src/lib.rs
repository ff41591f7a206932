pub mod camera;
pub mod config;
pub mod error;
pub mod geom;
pub mod report;
