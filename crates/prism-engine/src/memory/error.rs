use super::SlotKind;

/// Errors raised by slot declaration, lookup and writes.
///
/// All of these are configuration errors: the program and the material
/// disagree about which buffers exist or how large they are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("no {kind} buffer declared under {name}")]
    UnknownSlot { kind: SlotKind, name: String },

    #[error("buffer {name} is declared more than once")]
    DuplicateSlot { name: String },

    #[error("buffer {name} declared with {size} bytes; sizes must be non-zero multiples of 4")]
    BadSize { name: String, size: u64 },

    #[error("write of {len} bytes overflows {kind} buffer {name} ({size} bytes)")]
    Overflow {
        kind: SlotKind,
        name: String,
        len: u64,
        size: u64,
    },

    #[error("write of {len} bytes into {name} is not a multiple of 4 bytes")]
    Unaligned { name: String, len: u64 },
}
