//! Camera state consumed by post-process stages.

/// The [`CameraView`](core::CameraView) trait and a perspective camera.
pub mod core;

pub use self::core::{Camera, CameraView};
