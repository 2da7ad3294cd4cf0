use thiserror::Error;

use crate::memory::MemoryError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// The binding contract disagrees with itself or with the declared memory.
    #[error("binding {binding}: {reason}")]
    Binding { binding: u32, reason: String },

    /// A texture or sampler binding has nothing bound to it.
    #[error("binding {binding}: no {what} supplied")]
    MissingResource { binding: u32, what: &'static str },

    /// The device rejected the module, layout or pipeline.
    #[error("pipeline rejected by the device: {0}")]
    Validation(String),

    #[error("scene holds {count} objects but storage is sized for {limit}")]
    CapacityExceeded { count: usize, limit: u32 },
}
