use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::memory::{as_f32_sequence, ResourceMemory, ResourceMemoryBuilder, SlotKind};
use crate::render::{RenderCtx, RenderSettings};
use crate::resource::Texture2D;
use crate::scene::Scene;
use crate::shader::{
    compile_mesh_pipeline, AssembledPipeline, BindingContract, PipelineAssembly, PipelineError,
    SampledTexture, ShaderPipeline, ShaderProgram,
};

const MAT4_BYTES: u64 = 16 * 4;
const VEC4_BYTES: u64 = 4 * 4;

const ALBEDO: usize = 0;
const ROUGHNESS: usize = 1;

/// Buffer slots read by the Cook-Torrance program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CookTorranceSlot {
    ViewProjection,
    Eye,
    Transforms,
    Normals,
    Colors,
}

/// Slot table for a pipeline sized for `limit` objects.
fn slot_table(limit: u32) -> [(CookTorranceSlot, SlotKind, u64); 5] {
    let limit = u64::from(limit);
    [
        (CookTorranceSlot::ViewProjection, SlotKind::Uniform, MAT4_BYTES),
        (CookTorranceSlot::Eye, SlotKind::Uniform, VEC4_BYTES),
        (CookTorranceSlot::Transforms, SlotKind::Storage, limit * MAT4_BYTES),
        (CookTorranceSlot::Normals, SlotKind::Storage, limit * MAT4_BYTES),
        (CookTorranceSlot::Colors, SlotKind::Storage, limit * VEC4_BYTES),
    ]
}

fn binding_contract() -> BindingContract<CookTorranceSlot> {
    use wgpu::ShaderStages as S;

    BindingContract::new()
        .with_uniform(0, S::VERTEX, CookTorranceSlot::ViewProjection)
        .with_uniform(1, S::FRAGMENT, CookTorranceSlot::Eye)
        .with_storage(2, S::VERTEX, CookTorranceSlot::Transforms)
        .with_storage(3, S::VERTEX, CookTorranceSlot::Normals)
        .with_storage(4, S::VERTEX, CookTorranceSlot::Colors)
        .with_texture(5, S::FRAGMENT, ALBEDO)
        .with_sampler(6, S::FRAGMENT, ALBEDO)
        .with_texture(7, S::FRAGMENT, ROUGHNESS)
        .with_sampler(8, S::FRAGMENT, ROUGHNESS)
}

/// Textured Cook-Torrance reflectance under a single point light.
pub struct CookTorrance {
    albedo: Arc<Texture2D>,
    roughness: Arc<Texture2D>,
    contract: BindingContract<CookTorranceSlot>,
    object_limit: u32,
}

impl CookTorrance {
    pub fn new(albedo: Arc<Texture2D>, roughness: Arc<Texture2D>, settings: &RenderSettings) -> Self {
        Self {
            albedo,
            roughness,
            contract: binding_contract(),
            object_limit: settings.object_limit,
        }
    }

    /// Number of objects the storage arrays hold.
    pub fn object_limit(&self) -> u32 {
        self.object_limit
    }
}

impl ShaderProgram for CookTorrance {
    type Key = CookTorranceSlot;

    fn label(&self) -> &str {
        "cook-torrance"
    }

    fn source(&self) -> &str {
        include_str!("shaders/cook_torrance.wgsl")
    }

    fn assemble_memory(
        &self,
        builder: ResourceMemoryBuilder<CookTorranceSlot>,
    ) -> Result<ResourceMemoryBuilder<CookTorranceSlot>, PipelineError> {
        slot_table(self.object_limit)
            .into_iter()
            .try_fold(builder, |builder, (key, kind, size)| match kind {
                SlotKind::Uniform => builder.declare_uniform(key, size),
                SlotKind::Storage => builder.declare_storage(key, size),
            })
            .map_err(PipelineError::from)
    }

    fn assemble_pipeline(
        &self,
        assembly: PipelineAssembly<'_, CookTorranceSlot>,
    ) -> Result<AssembledPipeline, PipelineError> {
        compile_mesh_pipeline(&assembly, "prism cook-torrance", &self.contract)
    }

    fn configure_resources(
        &self,
        device: &wgpu::Device,
        memory: &ResourceMemory<CookTorranceSlot>,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<wgpu::BindGroup, PipelineError> {
        let textures = [
            SampledTexture::from(self.albedo.as_ref()),
            SampledTexture::from(self.roughness.as_ref()),
        ];

        self.contract.create_bind_group(
            device,
            "prism cook-torrance bind group",
            bind_group_layout,
            memory,
            &textures,
        )
    }
}

pub type CookTorrancePipeline = ShaderPipeline<CookTorrance>;

impl ShaderPipeline<CookTorrance> {
    /// Builds the pipeline and uploads the camera and every object of `scene`.
    pub fn create(
        ctx: &RenderCtx<'_>,
        albedo: Arc<Texture2D>,
        roughness: Arc<Texture2D>,
        scene: &Scene,
    ) -> Result<Self, PipelineError> {
        let pipeline = Self::new(ctx, CookTorrance::new(albedo, roughness, &ctx.settings))?;
        pipeline.upload_camera(scene)?;
        pipeline.upload_objects(scene)?;
        Ok(pipeline)
    }

    /// Writes the active camera's view-projection matrix and eye position.
    pub fn upload_camera(&self, scene: &Scene) -> Result<(), PipelineError> {
        let camera = scene.active_camera();
        let memory = self.memory();

        memory.write_uniform(
            &CookTorranceSlot::ViewProjection,
            bytemuck::cast_slice(&camera.view_projection().to_cols_array()),
        )?;
        memory.write_uniform(
            &CookTorranceSlot::Eye,
            bytemuck::cast_slice(&camera.eye().extend(1.0).to_array()),
        )?;
        Ok(())
    }

    /// Writes transforms, normal matrices and colors of every object.
    pub fn upload_objects(&self, scene: &Scene) -> Result<(), PipelineError> {
        check_capacity(scene.len(), self.program().object_limit())?;
        let memory = self.memory();

        memory.write_storage(
            &CookTorranceSlot::Transforms,
            bytemuck::cast_slice(&pack_matrices(scene.transforms())),
        )?;
        memory.write_storage(
            &CookTorranceSlot::Normals,
            bytemuck::cast_slice(&pack_matrices(scene.normals())),
        )?;
        memory.write_storage(
            &CookTorranceSlot::Colors,
            bytemuck::cast_slice(&pack_colors(scene.colors())),
        )?;

        log::debug!("uploaded {} objects", scene.len());
        Ok(())
    }
}

fn check_capacity(count: usize, limit: u32) -> Result<(), PipelineError> {
    if count > limit as usize {
        return Err(PipelineError::CapacityExceeded { count, limit });
    }
    Ok(())
}

/// Column-major `mat4x4<f32>` array.
fn pack_matrices(matrices: &[Mat4]) -> Vec<f32> {
    let blocks: Vec<[f32; 16]> = matrices.iter().map(Mat4::to_cols_array).collect();
    as_f32_sequence(&blocks, 16)
}

/// `vec4<f32>` array; the fourth lane is padding.
fn pack_colors(colors: &[Vec3]) -> Vec<f32> {
    let blocks: Vec<[f32; 3]> = colors.iter().map(Vec3::to_array).collect();
    as_f32_sequence(&blocks, 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLayout;
    use crate::render::Renderer;
    use crate::resource::{ResourceBuilder, ResourceManager};
    use crate::scene::{CameraBuilder, SceneBuilder, TransformBuilder};
    use crate::shader::Vertex;
    use crate::test_support;

    fn declared(limit: u32) -> MemoryLayout<CookTorranceSlot> {
        let mut layout = MemoryLayout::new();
        for (key, kind, size) in slot_table(limit) {
            layout.declare(key, kind, size).unwrap();
        }
        layout
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn slot_sizes_follow_the_object_limit() {
        let layout = declared(128);
        assert_eq!(layout.get(&CookTorranceSlot::ViewProjection).unwrap().size, 64);
        assert_eq!(layout.get(&CookTorranceSlot::Eye).unwrap().size, 16);
        assert_eq!(layout.get(&CookTorranceSlot::Transforms).unwrap().size, 128 * 64);
        assert_eq!(layout.get(&CookTorranceSlot::Normals).unwrap().size, 128 * 64);
        assert_eq!(layout.get(&CookTorranceSlot::Colors).unwrap().size, 128 * 16);
    }

    #[test]
    fn binding_contract_matches_declared_memory() {
        let contract = binding_contract();
        assert!(contract.validate(&declared(8)).is_ok());

        let bindings: Vec<u32> = contract.entries().iter().map(|e| e.binding).collect();
        assert_eq!(bindings, (0..9).collect::<Vec<_>>());
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn matrices_pack_column_major_in_order() {
        let a = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let b = Mat4::from_scale(Vec3::splat(2.0));
        let packed = pack_matrices(&[a, b]);

        assert_eq!(packed.len(), 32);
        assert_eq!(&packed[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(&packed[16..32], &b.to_cols_array());
    }

    #[test]
    fn colors_pad_to_vec4() {
        let packed = pack_colors(&[Vec3::new(0.8, 0.2, 0.4), Vec3::new(0.2, 0.4, 0.8)]);
        assert_eq!(packed, vec![0.8, 0.2, 0.4, 0.0, 0.2, 0.4, 0.8, 0.0]);
    }

    #[test]
    fn capacity_is_enforced() {
        assert!(check_capacity(0, 128).is_ok());
        assert!(check_capacity(128, 128).is_ok());
        assert!(matches!(
            check_capacity(129, 128),
            Err(PipelineError::CapacityExceeded { count: 129, limit: 128 })
        ));
    }

    // ── end to end ────────────────────────────────────────────────────────

    const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn triangle() -> [Vertex; 3] {
        [
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        ]
    }

    fn resources(device: &wgpu::Device, queue: &wgpu::Queue) -> ResourceManager {
        let white = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
        let grey = image::RgbaImage::from_pixel(4, 4, image::Rgba([128, 128, 128, 255]));

        ResourceBuilder::new(device, queue)
            .with_mesh("BOX", &triangle())
            .unwrap()
            .with_mesh("CONE", &triangle())
            .unwrap()
            .with_texture_image("ALBEDO", white)
            .with_texture_image("ROUGHNESS", grey)
            .build()
            .unwrap()
    }

    fn reference_scene(resources: &ResourceManager) -> Scene {
        let camera = CameraBuilder::new()
            .with_look_at(Vec3::splat(4.0), Vec3::ZERO)
            .with_perspective(1.0)
            .build();

        SceneBuilder::new(resources)
            .with_camera(camera)
            .with_object(
                "BOX",
                TransformBuilder::new().with_translation(Vec3::new(-1.0, -1.0, 0.0)).build(),
                Vec3::new(0.8, 0.2, 0.4),
            )
            .and_then(|b| {
                b.with_object(
                    "BOX",
                    TransformBuilder::new().with_translation(Vec3::new(-1.0, 1.0, 0.0)).build(),
                    Vec3::new(0.4, 0.8, 0.2),
                )
            })
            .and_then(|b| b.with_object("CONE", Mat4::IDENTITY, Vec3::new(0.2, 0.4, 0.8)))
            .and_then(SceneBuilder::build)
            .unwrap()
    }

    #[test]
    fn reference_scene_renders_three_draws() {
        let Some((device, queue)) = test_support::device() else { return };
        let resources = resources(&device, &queue);
        let scene = reference_scene(&resources);

        let ctx = RenderCtx::new(&device, &queue, OUTPUT_FORMAT, (64, 64), RenderSettings::default());
        let pipeline = CookTorrancePipeline::create(
            &ctx,
            resources.texture("ALBEDO").unwrap().clone(),
            resources.texture("ROUGHNESS").unwrap().clone(),
            &scene,
        )
        .unwrap();
        let renderer = Renderer::new(&ctx);

        let output = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test output"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = output.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        let draws = renderer.encode(&mut encoder, &view, &scene, &pipeline).unwrap();
        queue.submit(std::iter::once(encoder.finish()));

        assert_eq!(draws, 3);
    }

    #[test]
    fn too_many_objects_fail_the_upload() {
        let Some((device, queue)) = test_support::device() else { return };
        let resources = resources(&device, &queue);
        let scene = reference_scene(&resources);

        let settings = RenderSettings {
            object_limit: 2,
            ..RenderSettings::default()
        };
        let ctx = RenderCtx::new(&device, &queue, OUTPUT_FORMAT, (64, 64), settings);
        let result = CookTorrancePipeline::create(
            &ctx,
            resources.texture("ALBEDO").unwrap().clone(),
            resources.texture("ROUGHNESS").unwrap().clone(),
            &scene,
        );

        assert!(matches!(
            result,
            Err(PipelineError::CapacityExceeded { count: 3, limit: 2 })
        ));
    }
}
