//! Prism engine crate.
//!
//! A small wgpu scene renderer: named shader-resource memory, a shader
//! pipeline abstraction with one Cook-Torrance material, and a multisampled
//! renderer driven by a winit frame loop.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod window;

pub mod material;
pub mod memory;
pub mod render;
pub mod resource;
pub mod scene;
pub mod shader;

#[cfg(test)]
mod test_support;
