use thiserror::Error;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::scene::Scene;
use crate::shader::{PipelineError, ShaderPipeline, ShaderProgram};

use super::draw::record_draws;
use super::{RenderCtx, RenderSettings};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("surface cannot recover: {0}")]
    Surface(wgpu::SurfaceError),
}

/// What happened to the frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented { draws: u32 },
    /// No surface image this time; the next frame may succeed.
    Skipped,
}

/// Owns the multisampled color and depth targets and records one pass per
/// frame.
///
/// Targets are sized once, at construction, to the output size of the
/// context; the window is not resizable.
pub struct Renderer {
    settings: RenderSettings,
    /// Absent when rendering single-sampled straight into the output.
    color: Option<wgpu::TextureView>,
    depth: wgpu::TextureView,
}

impl Renderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let settings = ctx.settings;
        let (width, height) = ctx.size;
        let extent = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        let target = |label: &str, format: wgpu::TextureFormat| {
            ctx.device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: extent,
                    mip_level_count: 1,
                    sample_count: settings.sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let color = (settings.sample_count > 1)
            .then(|| target("prism msaa color", ctx.surface_format));
        let depth = target("prism depth", settings.depth_format);

        log::debug!(
            "render targets {}x{} ({} samples, {:?})",
            extent.width,
            extent.height,
            settings.sample_count,
            settings.depth_format
        );

        Self {
            settings,
            color,
            depth,
        }
    }

    /// Renders `scene` with `pipeline` and presents the result.
    ///
    /// Surface errors the device context can recover from skip the frame; only
    /// an unrecoverable surface is an error.
    pub fn run<P: ShaderProgram>(
        &self,
        gpu: &Gpu<'_>,
        scene: &Scene,
        pipeline: &ShaderPipeline<P>,
    ) -> Result<FrameOutcome, RenderError> {
        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err.clone()) {
                    SurfaceErrorAction::Fatal => Err(RenderError::Surface(err)),
                    action => {
                        log::debug!("frame skipped ({action:?}): {err}");
                        Ok(FrameOutcome::Skipped)
                    }
                };
            }
        };

        let draws = self.encode(&mut frame.encoder, &frame.output, scene, pipeline)?;
        gpu.submit(frame);

        Ok(FrameOutcome::Presented { draws })
    }

    /// Records the frame's single render pass into `encoder`, resolving into
    /// `output`.
    pub fn encode<P: ShaderProgram>(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
        scene: &Scene,
        pipeline: &ShaderPipeline<P>,
    ) -> Result<u32, RenderError> {
        // Multisampled contents are dead once resolved.
        let (view, resolve_target, store) = match &self.color {
            Some(msaa) => (msaa, Some(output), wgpu::StoreOp::Discard),
            None => (output, None, wgpu::StoreOp::Store),
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.settings.background),
                    store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pipeline.configure_pass(&mut pass)?;
        Ok(record_draws(&mut pass, scene.meshes()))
    }
}
