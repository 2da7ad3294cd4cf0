/// Fixed render configuration shared by the renderer and the materials.
///
/// Render targets and storage arrays are sized from these values once, at
/// construction; changing them later has no effect on existing objects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderSettings {
    /// MSAA samples per pixel for the color and depth targets.
    pub sample_count: u32,

    pub depth_format: wgpu::TextureFormat,

    /// Clear color of the multisampled target.
    pub background: wgpu::Color,

    /// Upper bound on objects per scene; sizes the per-object storage arrays.
    pub object_limit: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sample_count: 4,
            depth_format: wgpu::TextureFormat::Depth24Plus,
            background: wgpu::Color {
                r: 12.0 / 255.0,
                g: 32.0 / 255.0,
                b: 55.0 / 255.0,
                a: 1.0,
            },
            object_limit: 128,
        }
    }
}
