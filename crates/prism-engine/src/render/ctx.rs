use super::RenderSettings;

/// Renderer-facing context (device/queue + surface format + settings).
///
/// This is intentionally small and stable.
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Output size in physical pixels.
    pub size: (u32, u32),
    pub settings: RenderSettings,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        settings: RenderSettings,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            size,
            settings,
        }
    }

    /// Context for the window surface owned by `gpu`.
    pub fn from_gpu(gpu: &'a crate::device::Gpu<'_>, settings: RenderSettings) -> Self {
        Self::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            gpu.output_size(),
            settings,
        )
    }
}
