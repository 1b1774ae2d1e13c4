pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod inertia;
pub mod scene;
pub mod simulate;
pub mod types;
pub mod viewer;

pub use camera::{compose_view_matrix, Camera, FrameMotion, CAMERA_UNIFORM_NAME};
pub use config::CameraConfig;
pub use crate::core::{InputSnapshot, UniformBinder};
