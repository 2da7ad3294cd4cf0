use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::MemoryError;

/// Key type accepted by resource memory.
///
/// Any hashable, comparable, debuggable value works: string names, or a
/// per-material enum when the slot set is known at compile time.
pub trait SlotKey: Eq + Hash + Clone + fmt::Debug {}

impl<T> SlotKey for T where T: Eq + Hash + Clone + fmt::Debug {}

/// Buffer binding class of a slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SlotKind {
    /// Small fixed-layout per-frame constants.
    Uniform,
    /// Read-only arrays indexed by the shader (per-object data).
    Storage,
}

impl SlotKind {
    /// Buffer usages required by a slot of this kind.
    pub fn usage(self) -> wgpu::BufferUsages {
        match self {
            SlotKind::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            SlotKind::Storage => wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Uniform => f.write_str("uniform"),
            SlotKind::Storage => f.write_str("storage"),
        }
    }
}

/// A single slot declaration: kind + exact byte size.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SlotDecl {
    pub kind: SlotKind,
    pub size: u64,
}

/// Declaration table of a resource memory instance.
///
/// Holds no GPU objects; it answers "does this slot exist, with which kind,
/// and does a write of N bytes fit" for both the buffer store and the binding
/// contract validation.
#[derive(Debug, Clone)]
pub struct MemoryLayout<K> {
    slots: HashMap<K, SlotDecl>,
    /// Keys in declaration order.
    order: Vec<K>,
}

impl<K: SlotKey> Default for MemoryLayout<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: SlotKey> MemoryLayout<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a slot.
    ///
    /// Keys are unique across both kinds. Sizes must be non-zero multiples of
    /// `wgpu::COPY_BUFFER_ALIGNMENT`.
    pub fn declare(&mut self, key: K, kind: SlotKind, size: u64) -> Result<SlotDecl, MemoryError> {
        if self.slots.contains_key(&key) {
            return Err(MemoryError::DuplicateSlot {
                name: format!("{key:?}"),
            });
        }
        if size == 0 || size % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(MemoryError::BadSize {
                name: format!("{key:?}"),
                size,
            });
        }

        let decl = SlotDecl { kind, size };
        self.order.push(key.clone());
        self.slots.insert(key, decl);
        Ok(decl)
    }

    /// Returns the declaration for `key` regardless of kind.
    pub fn get<Q>(&self, key: &Q) -> Option<SlotDecl>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(key).copied()
    }

    /// Returns the declaration for `key` if it was declared with `kind`.
    pub fn lookup<Q>(&self, key: &Q, kind: SlotKind) -> Result<SlotDecl, MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        match self.slots.get(key) {
            Some(decl) if decl.kind == kind => Ok(*decl),
            _ => Err(MemoryError::UnknownSlot {
                kind,
                name: format!("{key:?}"),
            }),
        }
    }

    /// Validates a write of `len` bytes at offset 0.
    pub fn check_write<Q>(&self, key: &Q, kind: SlotKind, len: usize) -> Result<SlotDecl, MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let decl = self.lookup(key, kind)?;
        let len = len as u64;

        if len > decl.size {
            return Err(MemoryError::Overflow {
                kind,
                name: format!("{key:?}"),
                len,
                size: decl.size,
            });
        }
        if len % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(MemoryError::Unaligned {
                name: format!("{key:?}"),
                len,
            });
        }

        Ok(decl)
    }

    /// Iterates declarations in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = (&K, SlotDecl)> {
        self.order.iter().map(|k| (k, self.slots[k]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
