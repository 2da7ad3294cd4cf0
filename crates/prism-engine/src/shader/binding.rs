use std::collections::HashSet;
use std::num::NonZeroU64;

use crate::memory::{MemoryLayout, ResourceMemory, SlotKey, SlotKind};
use crate::resource::Texture2D;

use super::PipelineError;

/// What sits behind one binding index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind<K> {
    Uniform(K),
    /// Read-only storage buffer.
    Storage(K),
    /// View of the n-th sampled texture handed to the bind group.
    Texture(usize),
    /// Sampler of the n-th sampled texture handed to the bind group.
    Sampler(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEntry<K> {
    pub binding: u32,
    pub visibility: wgpu::ShaderStages,
    pub kind: BindingKind<K>,
}

/// Texture view + sampler pair bound by `Texture(n)` / `Sampler(n)` entries.
#[derive(Debug, Clone, Copy)]
pub struct SampledTexture<'a> {
    pub view: &'a wgpu::TextureView,
    pub sampler: &'a wgpu::Sampler,
}

impl<'a> From<&'a Texture2D> for SampledTexture<'a> {
    fn from(texture: &'a Texture2D) -> Self {
        Self {
            view: texture.view(),
            sampler: texture.sampler(),
        }
    }
}

/// Ordered description of bind group 0.
///
/// Both the bind group layout and every bind group are generated from the
/// same entries, so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct BindingContract<K> {
    entries: Vec<BindingEntry<K>>,
}

impl<K> Default for BindingContract<K> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: SlotKey> BindingContract<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniform(self, binding: u32, visibility: wgpu::ShaderStages, key: K) -> Self {
        self.with(binding, visibility, BindingKind::Uniform(key))
    }

    pub fn with_storage(self, binding: u32, visibility: wgpu::ShaderStages, key: K) -> Self {
        self.with(binding, visibility, BindingKind::Storage(key))
    }

    pub fn with_texture(self, binding: u32, visibility: wgpu::ShaderStages, texture: usize) -> Self {
        self.with(binding, visibility, BindingKind::Texture(texture))
    }

    pub fn with_sampler(self, binding: u32, visibility: wgpu::ShaderStages, texture: usize) -> Self {
        self.with(binding, visibility, BindingKind::Sampler(texture))
    }

    fn with(mut self, binding: u32, visibility: wgpu::ShaderStages, kind: BindingKind<K>) -> Self {
        self.entries.push(BindingEntry {
            binding,
            visibility,
            kind,
        });
        self
    }

    pub fn entries(&self) -> &[BindingEntry<K>] {
        &self.entries
    }

    /// Checks the contract against the declared memory.
    ///
    /// Binding indices must be unique and every buffer entry must name a slot
    /// declared with the matching kind.
    pub fn validate(&self, layout: &MemoryLayout<K>) -> Result<(), PipelineError> {
        let mut seen = HashSet::with_capacity(self.entries.len());

        for entry in &self.entries {
            if !seen.insert(entry.binding) {
                return Err(PipelineError::Binding {
                    binding: entry.binding,
                    reason: "index used twice".to_string(),
                });
            }

            if let Some((key, kind)) = buffer_slot(&entry.kind) {
                layout.lookup(key, kind).map_err(|_| PipelineError::Binding {
                    binding: entry.binding,
                    reason: format!("{key:?} is not a declared {kind} slot"),
                })?;
            }
        }

        Ok(())
    }

    /// Layout entries in contract order. Validates first.
    pub fn layout_entries(
        &self,
        layout: &MemoryLayout<K>,
    ) -> Result<Vec<wgpu::BindGroupLayoutEntry>, PipelineError> {
        self.validate(layout)?;

        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let ty = match &entry.kind {
                    BindingKind::Uniform(key) => buffer_type(
                        wgpu::BufferBindingType::Uniform,
                        layout.get(key).map(|d| d.size),
                    ),
                    BindingKind::Storage(key) => buffer_type(
                        wgpu::BufferBindingType::Storage { read_only: true },
                        layout.get(key).map(|d| d.size),
                    ),
                    BindingKind::Texture(_) => wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    BindingKind::Sampler(_) => {
                        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
                    }
                };

                wgpu::BindGroupLayoutEntry {
                    binding: entry.binding,
                    visibility: entry.visibility,
                    ty,
                    count: None,
                }
            })
            .collect();

        Ok(entries)
    }

    pub fn create_layout(
        &self,
        device: &wgpu::Device,
        label: &str,
        layout: &MemoryLayout<K>,
    ) -> Result<wgpu::BindGroupLayout, PipelineError> {
        let entries = self.layout_entries(layout)?;

        Ok(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &entries,
        }))
    }

    /// Wires every entry to its buffer, view or sampler.
    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        bind_group_layout: &wgpu::BindGroupLayout,
        memory: &ResourceMemory<K>,
        textures: &[SampledTexture<'_>],
    ) -> Result<wgpu::BindGroup, PipelineError> {
        let texture = |binding: u32, index: usize| {
            textures.get(index).ok_or(PipelineError::MissingResource {
                binding,
                what: "texture",
            })
        };

        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let resource = match &entry.kind {
                BindingKind::Uniform(key) => memory.get_uniform(key)?.as_entire_binding(),
                BindingKind::Storage(key) => memory.get_storage(key)?.as_entire_binding(),
                BindingKind::Texture(i) => {
                    wgpu::BindingResource::TextureView(texture(entry.binding, *i)?.view)
                }
                BindingKind::Sampler(i) => {
                    wgpu::BindingResource::Sampler(texture(entry.binding, *i)?.sampler)
                }
            };

            entries.push(wgpu::BindGroupEntry {
                binding: entry.binding,
                resource,
            });
        }

        Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bind_group_layout,
            entries: &entries,
        }))
    }
}

fn buffer_slot<K>(kind: &BindingKind<K>) -> Option<(&K, SlotKind)> {
    match kind {
        BindingKind::Uniform(key) => Some((key, SlotKind::Uniform)),
        BindingKind::Storage(key) => Some((key, SlotKind::Storage)),
        BindingKind::Texture(_) | BindingKind::Sampler(_) => None,
    }
}

fn buffer_type(ty: wgpu::BufferBindingType, size: Option<u64>) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty,
        has_dynamic_offset: false,
        min_binding_size: size.and_then(NonZeroU64::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V: wgpu::ShaderStages = wgpu::ShaderStages::VERTEX;
    const F: wgpu::ShaderStages = wgpu::ShaderStages::FRAGMENT;

    fn memory_layout() -> MemoryLayout<&'static str> {
        let mut l = MemoryLayout::new();
        l.declare("ViewProjection", SlotKind::Uniform, 64).unwrap();
        l.declare("Transforms", SlotKind::Storage, 4 * 64).unwrap();
        l
    }

    fn contract() -> BindingContract<&'static str> {
        BindingContract::new()
            .with_uniform(0, V, "ViewProjection")
            .with_storage(1, V, "Transforms")
            .with_texture(2, F, 0)
            .with_sampler(3, F, 0)
    }

    #[test]
    fn matching_contract_validates() {
        assert!(contract().validate(&memory_layout()).is_ok());
    }

    #[test]
    fn reused_binding_index_is_rejected() {
        let c = contract().with_sampler(2, F, 0);
        assert!(matches!(
            c.validate(&memory_layout()),
            Err(PipelineError::Binding { binding: 2, .. })
        ));
    }

    #[test]
    fn undeclared_slot_is_rejected() {
        let c = contract().with_uniform(4, F, "Eye");
        assert!(matches!(
            c.validate(&memory_layout()),
            Err(PipelineError::Binding { binding: 4, .. })
        ));
    }

    #[test]
    fn slot_bound_as_the_wrong_kind_is_rejected() {
        let c = BindingContract::new().with_uniform(0, V, "Transforms");
        let err = c.validate(&memory_layout()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "binding 0: \"Transforms\" is not a declared uniform slot"
        );
    }

    #[test]
    fn layout_entries_follow_the_contract() {
        let entries = contract().layout_entries(&memory_layout()).unwrap();
        assert_eq!(entries.len(), 4);

        assert_eq!(entries[0].binding, 0);
        assert_eq!(entries[0].visibility, V);
        assert!(matches!(
            entries[0].ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                min_binding_size: Some(size),
                ..
            } if size.get() == 64
        ));
        assert!(matches!(
            entries[1].ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                ..
            }
        ));
        assert!(matches!(entries[2].ty, wgpu::BindingType::Texture { .. }));
        assert!(matches!(
            entries[3].ty,
            wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
        ));
        assert_eq!(entries[3].visibility, F);
    }
}
