use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::{MemoryError, MemoryLayout, SlotKey, SlotKind};

/// Accumulates slot declarations, allocating each buffer as it is declared.
///
/// Fluent: every `declare_*` consumes and returns the builder so a material
/// can chain its whole layout with `?`.
pub struct ResourceMemoryBuilder<K> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: MemoryLayout<K>,
    buffers: HashMap<K, wgpu::Buffer>,
}

impl<K: SlotKey> ResourceMemoryBuilder<K> {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            layout: MemoryLayout::new(),
            buffers: HashMap::new(),
        }
    }

    /// Declares a uniform buffer of exactly `size` bytes.
    pub fn declare_uniform(self, key: K, size: u64) -> Result<Self, MemoryError> {
        self.declare(key, SlotKind::Uniform, size)
    }

    /// Declares a read-only storage buffer of exactly `size` bytes.
    pub fn declare_storage(self, key: K, size: u64) -> Result<Self, MemoryError> {
        self.declare(key, SlotKind::Storage, size)
    }

    fn declare(mut self, key: K, kind: SlotKind, size: u64) -> Result<Self, MemoryError> {
        self.layout.declare(key.clone(), kind, size)?;

        let label = format!("prism {kind} buffer {key:?}");
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size,
            usage: kind.usage(),
            mapped_at_creation: false,
        });

        self.buffers.insert(key, buffer);
        Ok(self)
    }

    /// Freezes the declarations.
    pub fn build(self) -> ResourceMemory<K> {
        log::debug!("resource memory assembled with {} slots", self.layout.len());

        ResourceMemory {
            queue: self.queue,
            layout: self.layout,
            buffers: self.buffers,
        }
    }
}

/// Frozen name → buffer mapping owned by one shader pipeline.
///
/// Slots cannot be added, removed or resized. Writes go through the queue at
/// offset 0 and are ordered before any later submission.
pub struct ResourceMemory<K> {
    queue: wgpu::Queue,
    layout: MemoryLayout<K>,
    buffers: HashMap<K, wgpu::Buffer>,
}

impl<K: SlotKey> ResourceMemory<K> {
    pub fn write_uniform<Q>(&self, key: &Q, bytes: &[u8]) -> Result<(), MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.write(key, SlotKind::Uniform, bytes)
    }

    pub fn write_storage<Q>(&self, key: &Q, bytes: &[u8]) -> Result<(), MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.write(key, SlotKind::Storage, bytes)
    }

    pub fn get_uniform<Q>(&self, key: &Q) -> Result<&wgpu::Buffer, MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.buffer(key, SlotKind::Uniform)
    }

    pub fn get_storage<Q>(&self, key: &Q) -> Result<&wgpu::Buffer, MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.buffer(key, SlotKind::Storage)
    }

    /// Declarations backing this store.
    pub fn layout(&self) -> &MemoryLayout<K> {
        &self.layout
    }

    fn write<Q>(&self, key: &Q, kind: SlotKind, bytes: &[u8]) -> Result<(), MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.layout.check_write(key, kind, bytes.len())?;
        let buffer = self.buffer(key, kind)?;

        if !bytes.is_empty() {
            self.queue.write_buffer(buffer, 0, bytes);
        }
        Ok(())
    }

    fn buffer<Q>(&self, key: &Q, kind: SlotKind) -> Result<&wgpu::Buffer, MemoryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.layout.lookup(key, kind)?;
        self.buffers.get(key).ok_or_else(|| MemoryError::UnknownSlot {
            kind,
            name: format!("{key:?}"),
        })
    }
}
