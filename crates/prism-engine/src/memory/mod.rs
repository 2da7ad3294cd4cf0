//! Named shader-resource memory.
//!
//! A material declares every uniform and storage buffer its program reads
//! while the pipeline is being assembled. After `build()` the set of slots and
//! their sizes is frozen; only buffer contents change from frame to frame.
//!
//! Declaration and writing are separate operations on separate types:
//! - `ResourceMemoryBuilder` declares slots and allocates buffers
//! - `ResourceMemory` writes into and hands out the allocated buffers

mod error;
mod layout;
mod pack;
mod store;

pub use error::MemoryError;
pub use layout::{MemoryLayout, SlotDecl, SlotKey, SlotKind};
pub use pack::as_f32_sequence;
pub use store::{ResourceMemory, ResourceMemoryBuilder};
