//! Scene description consumed by the renderer.
//!
//! Responsibilities:
//! - orbiting camera with a spherical orientation (`Camera`, `CameraBuilder`)
//! - object transforms (`TransformBuilder`)
//! - the per-object arrays indexed by draw instance id (`Scene`, `SceneBuilder`)

mod camera;
mod snapshot;
mod transform;

pub use camera::{
    cartesian_to_spherical, spherical_to_cartesian, Camera, CameraBuilder, Spherical, THETA_MARGIN,
    WORLD_UP,
};
pub use snapshot::{normal_matrix, Scene, SceneBuilder, SceneError};
pub use transform::TransformBuilder;
