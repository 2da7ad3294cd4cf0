/// One acquired surface image plus the encoder recording into it.
///
/// Hand it back through `Gpu::submit` in the same frame: while the surface
/// texture is held, the next image cannot be acquired.
pub struct GpuFrame {
    pub(super) surface_texture: wgpu::SurfaceTexture,
    /// Single-sampled view of the surface image; the resolve target.
    pub output: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
