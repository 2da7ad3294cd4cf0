//! GPU rendering subsystem.
//!
//! The renderer owns the multisampled targets and records one pass per frame:
//! clear, configure the shader pipeline, draw every scene object with its
//! index as instance id, resolve into the output image.

mod ctx;
mod draw;
mod renderer;
mod settings;

pub use ctx::RenderCtx;
pub use draw::{record_draws, DrawRecorder, Drawable};
pub use renderer::{FrameOutcome, RenderError, Renderer};
pub use settings::RenderSettings;
