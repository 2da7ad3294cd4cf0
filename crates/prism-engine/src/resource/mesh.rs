use wgpu::util::DeviceExt;

use crate::shader::Vertex;

use super::ResourceError;

/// Immutable vertex buffer plus the number of vertices it holds.
#[derive(Debug)]
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl Mesh {
    /// Uploads `vertices` into a new vertex buffer.
    pub fn new(device: &wgpu::Device, name: &str, vertices: &[Vertex]) -> Result<Self, ResourceError> {
        if vertices.is_empty() {
            return Err(ResourceError::EmptyMesh {
                key: name.to_string(),
            });
        }

        let contents: &[u8] = bytemuck::cast_slice(vertices);
        let label = format!("prism mesh {name}");

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            vertex_buffer,
            vertex_count: vertex_count_of(contents.len() as u64),
        })
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Vertex count derived from a byte length (truncating partial vertices).
pub(crate) fn vertex_count_of(byte_len: u64) -> u32 {
    (byte_len / Vertex::STRIDE) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn vertex_count_is_byte_length_over_stride() {
        assert_eq!(vertex_count_of(0), 0);
        assert_eq!(vertex_count_of(32), 1);
        assert_eq!(vertex_count_of(36 * 32), 36);
        assert_eq!(vertex_count_of(70), 2);
    }

    #[test]
    fn uploads_all_vertices() {
        let Some((device, _queue)) = test_support::device() else { return };
        let tri = [Vertex::default(); 3];
        let mesh = Mesh::new(&device, "tri", &tri).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertex_buffer().size(), 96);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let Some((device, _queue)) = test_support::device() else { return };
        assert!(matches!(
            Mesh::new(&device, "nothing", &[]),
            Err(ResourceError::EmptyMesh { .. })
        ));
    }
}
