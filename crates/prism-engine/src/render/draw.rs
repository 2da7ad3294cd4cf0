use std::ops::Range;
use std::sync::Arc;

use crate::resource::Mesh;

/// Anything that knows how many vertices one draw covers.
pub trait Drawable {
    fn vertex_count(&self) -> u32;
}

impl Drawable for Mesh {
    fn vertex_count(&self) -> u32 {
        Mesh::vertex_count(self)
    }
}

/// Sink for the per-object draw commands of a frame.
///
/// `wgpu::RenderPass` is the real implementation.
pub trait DrawRecorder<M: ?Sized> {
    fn bind_vertices(&mut self, slot: u32, mesh: &M);
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);
}

impl DrawRecorder<Mesh> for wgpu::RenderPass<'_> {
    fn bind_vertices(&mut self, slot: u32, mesh: &Mesh) {
        self.set_vertex_buffer(slot, mesh.vertex_buffer().slice(..));
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, instances);
    }
}

/// Issues one draw per mesh, in order, with instance id = object index.
///
/// The shader indexes its per-object storage arrays by instance id, so the
/// ids must run `0..n` without gaps. Returns the number of draws.
pub fn record_draws<M, R>(recorder: &mut R, meshes: &[Arc<M>]) -> u32
where
    M: Drawable,
    R: DrawRecorder<M>,
{
    let mut draws = 0;
    for (index, mesh) in (0u32..).zip(meshes) {
        recorder.bind_vertices(0, mesh);
        recorder.draw(0..mesh.vertex_count(), index..index + 1);
        draws += 1;
    }
    draws
}
