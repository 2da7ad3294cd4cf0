use crate::memory::{MemoryLayout, ResourceMemory, ResourceMemoryBuilder, SlotKey};
use crate::render::{RenderCtx, RenderSettings};

use super::{BindingContract, PipelineError, Vertex};

/// Inputs available while a program builds its render pipeline.
pub struct PipelineAssembly<'a, K> {
    pub device: &'a wgpu::Device,
    pub module: &'a wgpu::ShaderModule,
    /// Slots declared by `assemble_memory`.
    pub memory: &'a MemoryLayout<K>,
    pub color_format: wgpu::TextureFormat,
    pub settings: &'a RenderSettings,
}

pub struct AssembledPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// A WGSL program together with the resources it binds.
///
/// Implementors describe; [`ShaderPipeline`] drives. All three operations may
/// fail, and a failure aborts pipeline construction.
pub trait ShaderProgram {
    /// Slot key of this program's resource memory.
    type Key: SlotKey;

    /// Debug label for every GPU object created for this program.
    fn label(&self) -> &str;

    /// WGSL source with `vs_main` and `fs_main` entry points.
    fn source(&self) -> &str;

    /// Declares every uniform and storage slot the program reads.
    fn assemble_memory(
        &self,
        builder: ResourceMemoryBuilder<Self::Key>,
    ) -> Result<ResourceMemoryBuilder<Self::Key>, PipelineError>;

    /// Builds the bind group layout and compiles the render pipeline.
    fn assemble_pipeline(
        &self,
        assembly: PipelineAssembly<'_, Self::Key>,
    ) -> Result<AssembledPipeline, PipelineError>;

    /// Builds the bind group for the current frame.
    fn configure_resources(
        &self,
        device: &wgpu::Device,
        memory: &ResourceMemory<Self::Key>,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<wgpu::BindGroup, PipelineError>;
}

/// A fully assembled program: module, memory, pipeline.
///
/// Only constructed through [`ShaderPipeline::new`], which either finishes
/// every assembly step or returns the first error.
pub struct ShaderPipeline<P: ShaderProgram> {
    program: P,
    device: wgpu::Device,
    memory: ResourceMemory<P::Key>,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl<P: ShaderProgram> ShaderPipeline<P> {
    /// Compiles the module, assembles memory, then assembles the pipeline.
    ///
    /// Device validation errors raised on the way (malformed WGSL, a layout
    /// the shader disagrees with) come back as [`PipelineError::Validation`].
    pub fn new(ctx: &RenderCtx<'_>, program: P) -> Result<Self, PipelineError> {
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let assembled = Self::assemble(ctx, &program);
        let validation = pollster::block_on(scope.pop());

        let (memory, pipeline, bind_group_layout) = assembled?;
        if let Some(err) = validation {
            return Err(PipelineError::Validation(err.to_string()));
        }

        log::info!(
            "{} pipeline ready ({} slots, {}x MSAA)",
            program.label(),
            memory.layout().len(),
            ctx.settings.sample_count
        );

        Ok(Self {
            program,
            device: ctx.device.clone(),
            memory,
            pipeline,
            bind_group_layout,
        })
    }

    fn assemble(
        ctx: &RenderCtx<'_>,
        program: &P,
    ) -> Result<(ResourceMemory<P::Key>, wgpu::RenderPipeline, wgpu::BindGroupLayout), PipelineError>
    {
        let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.label()),
            source: wgpu::ShaderSource::Wgsl(program.source().into()),
        });

        let memory = program
            .assemble_memory(ResourceMemoryBuilder::new(ctx.device, ctx.queue))?
            .build();

        let AssembledPipeline {
            pipeline,
            bind_group_layout,
        } = program.assemble_pipeline(PipelineAssembly {
            device: ctx.device,
            module: &module,
            memory: memory.layout(),
            color_format: ctx.surface_format,
            settings: &ctx.settings,
        })?;

        Ok((memory, pipeline, bind_group_layout))
    }

    /// Sets the pipeline and a freshly built bind group 0 on `pass`.
    pub fn configure_pass(&self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), PipelineError> {
        let bind_group =
            self.program
                .configure_resources(&self.device, &self.memory, &self.bind_group_layout)?;

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        Ok(())
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn memory(&self) -> &ResourceMemory<P::Key> {
        &self.memory
    }
}

/// Compiles a mesh pipeline over [`Vertex`] buffers: triangle list, depth
/// test `Less` with writes, multisampled per `settings`.
pub fn compile_mesh_pipeline<K: SlotKey>(
    assembly: &PipelineAssembly<'_, K>,
    label: &str,
    contract: &BindingContract<K>,
) -> Result<AssembledPipeline, PipelineError> {
    let device = assembly.device;
    let bind_group_layout =
        contract.create_layout(device, &format!("{label} bgl"), assembly.memory)?;

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} pipeline layout")),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: assembly.module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: assembly.module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: assembly.color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: assembly.settings.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: assembly.settings.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },

        multiview_mask: None,
        cache: None,
    });

    Ok(AssembledPipeline {
        pipeline,
        bind_group_layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::SampledTexture;
    use crate::test_support;

    const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    const TINT_WGSL: &str = r#"
@group(0) @binding(1) var<uniform> tint: vec4<f32>;

struct VertexIn {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(v: VertexIn) -> @builtin(position) vec4<f32> {
    return vec4<f32>(v.position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return tint;
}
"#;

    /// Flat-colored program whose single uniform is read by the fragment stage.
    struct Tint {
        source: &'static str,
        visibility: wgpu::ShaderStages,
    }

    impl Tint {
        fn contract(&self) -> BindingContract<&'static str> {
            BindingContract::new().with_uniform(1, self.visibility, "tint")
        }
    }

    impl ShaderProgram for Tint {
        type Key = &'static str;

        fn label(&self) -> &str {
            "tint"
        }

        fn source(&self) -> &str {
            self.source
        }

        fn assemble_memory(
            &self,
            builder: ResourceMemoryBuilder<&'static str>,
        ) -> Result<ResourceMemoryBuilder<&'static str>, PipelineError> {
            Ok(builder.declare_uniform("tint", 16)?)
        }

        fn assemble_pipeline(
            &self,
            assembly: PipelineAssembly<'_, &'static str>,
        ) -> Result<AssembledPipeline, PipelineError> {
            compile_mesh_pipeline(&assembly, "tint", &self.contract())
        }

        fn configure_resources(
            &self,
            device: &wgpu::Device,
            memory: &ResourceMemory<&'static str>,
            bind_group_layout: &wgpu::BindGroupLayout,
        ) -> Result<wgpu::BindGroup, PipelineError> {
            let textures: [SampledTexture<'_>; 0] = [];
            self.contract()
                .create_bind_group(device, "tint", bind_group_layout, memory, &textures)
        }
    }

    fn build(
        source: &'static str,
        visibility: wgpu::ShaderStages,
    ) -> Option<Result<ShaderPipeline<Tint>, PipelineError>> {
        let (device, queue) = test_support::device()?;
        let ctx = RenderCtx::new(&device, &queue, OUTPUT_FORMAT, (16, 16), RenderSettings::default());
        Some(ShaderPipeline::new(&ctx, Tint { source, visibility }))
    }

    #[test]
    fn matching_contract_assembles() {
        let Some(result) = build(TINT_WGSL, wgpu::ShaderStages::FRAGMENT) else { return };
        let pipeline = result.unwrap();
        assert_eq!(pipeline.memory().layout().len(), 1);
    }

    #[test]
    fn uniform_hidden_from_reading_stage_is_an_error() {
        let Some(result) = build(TINT_WGSL, wgpu::ShaderStages::VERTEX) else { return };
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn malformed_wgsl_is_an_error() {
        let Some(result) = build("@fragment fn fs_main( {", wgpu::ShaderStages::FRAGMENT) else { return };
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }
}
