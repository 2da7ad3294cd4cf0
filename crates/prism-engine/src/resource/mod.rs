//! GPU-resident meshes and textures plus the keyed registry that owns them.
//!
//! Everything here is created once during startup and is immutable afterwards.

mod error;
mod manager;
mod mesh;
mod texture;

pub use error::ResourceError;
pub use manager::{ResourceBuilder, ResourceManager};
pub use mesh::Mesh;
pub use texture::Texture2D;
