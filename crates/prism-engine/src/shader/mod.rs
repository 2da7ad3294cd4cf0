//! Shader program abstraction.
//!
//! A concrete program declares its buffer slots, its binding contract and its
//! render pipeline; [`ShaderPipeline`] assembles them in a fixed order and
//! configures a render pass with them every frame.

mod binding;
mod error;
mod pipeline;
mod vertex;

pub use binding::{BindingContract, BindingEntry, BindingKind, SampledTexture};
pub use error::PipelineError;
pub use pipeline::{compile_mesh_pipeline, AssembledPipeline, PipelineAssembly, ShaderPipeline, ShaderProgram};
pub use vertex::Vertex;
