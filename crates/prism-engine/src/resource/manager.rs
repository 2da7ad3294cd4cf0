use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;

use crate::shader::Vertex;

use super::texture::decode;
use super::{Mesh, ResourceError, Texture2D};

/// Read-only registry of the meshes and textures loaded at startup.
///
/// Lookups hand out the shared resource itself (`Arc`), never a copy.
pub struct ResourceManager<K = String> {
    meshes: HashMap<K, Arc<Mesh>>,
    textures: HashMap<K, Arc<Texture2D>>,
}

impl<K> ResourceManager<K>
where
    K: Eq + Hash + fmt::Debug,
{
    pub fn mesh<Q>(&self, key: &Q) -> Result<&Arc<Mesh>, ResourceError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.meshes.get(key).ok_or_else(|| ResourceError::UnknownMesh {
            key: format!("{key:?}"),
        })
    }

    pub fn texture<Q>(&self, key: &Q) -> Result<&Arc<Texture2D>, ResourceError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.textures.get(key).ok_or_else(|| ResourceError::UnknownTexture {
            key: format!("{key:?}"),
        })
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

enum PendingTexture {
    File(PathBuf),
    Image(image::RgbaImage),
}

enum Decoding<'scope> {
    Running(std::thread::ScopedJoinHandle<'scope, Result<image::RgbaImage, ResourceError>>),
    Ready(image::RgbaImage),
}

impl Decoding<'_> {
    fn finish(self) -> Result<image::RgbaImage, ResourceError> {
        match self {
            Decoding::Running(job) => job
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
            Decoding::Ready(image) => Ok(image),
        }
    }
}

/// Two-phase builder for [`ResourceManager`].
///
/// Meshes are uploaded as soon as they are registered. Textures are queued and
/// decoded by [`ResourceBuilder::build`], in parallel, then uploaded in
/// registration order. Registering a key twice replaces the earlier entry.
pub struct ResourceBuilder<K = String> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    meshes: HashMap<K, Arc<Mesh>>,
    pending: Vec<(K, PendingTexture)>,
}

impl<K> ResourceBuilder<K>
where
    K: Eq + Hash + fmt::Debug,
{
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            meshes: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Uploads a mesh and registers it under `key`.
    pub fn with_mesh(mut self, key: impl Into<K>, vertices: &[Vertex]) -> Result<Self, ResourceError> {
        let key = key.into();
        let mesh = Mesh::new(&self.device, &format!("{key:?}"), vertices)?;

        if self.meshes.insert(key, Arc::new(mesh)).is_some() {
            log::warn!("mesh registered twice; keeping the later one");
        }
        Ok(self)
    }

    /// Queues an image file to be decoded and registered under `key`.
    pub fn with_texture(mut self, key: impl Into<K>, path: impl Into<PathBuf>) -> Self {
        self.pending.push((key.into(), PendingTexture::File(path.into())));
        self
    }

    /// Queues an already-decoded image to be registered under `key`.
    pub fn with_texture_image(mut self, key: impl Into<K>, image: image::RgbaImage) -> Self {
        self.pending.push((key.into(), PendingTexture::Image(image)));
        self
    }

    /// Decodes and uploads every queued texture and freezes the registry.
    ///
    /// Files decode in parallel on worker threads; the call blocks until all
    /// of them finish. The first decode or upload failure rejects the whole
    /// build.
    pub fn build(self) -> Result<ResourceManager<K>, ResourceError> {
        let Self {
            device,
            queue,
            meshes,
            pending,
        } = self;

        // Decode on scoped worker threads; keys stay on this thread.
        let decoded: Vec<(K, String, Result<image::RgbaImage, ResourceError>)> =
            std::thread::scope(|scope| {
                let jobs: Vec<_> = pending
                    .into_iter()
                    .map(|(key, source)| match source {
                        PendingTexture::File(path) => {
                            let name = path.display().to_string();
                            (key, name, Decoding::Running(scope.spawn(move || decode(&path))))
                        }
                        PendingTexture::Image(image) => {
                            let name = format!("{key:?}");
                            (key, name, Decoding::Ready(image))
                        }
                    })
                    .collect();

                jobs.into_iter()
                    .map(|(key, name, decoding)| (key, name, decoding.finish()))
                    .collect()
            });

        let mut textures = HashMap::with_capacity(decoded.len());
        for (key, name, image) in decoded {
            let texture = Texture2D::from_image(&device, &queue, &name, &image?)?;
            log::debug!("texture {name} loaded ({}x{})", texture.size().0, texture.size().1);

            if textures.insert(key, Arc::new(texture)).is_some() {
                log::warn!("texture {name} registered twice; keeping the later one");
            }
        }

        log::info!(
            "resources ready: {} meshes, {} textures",
            meshes.len(),
            textures.len()
        );

        Ok(ResourceManager { meshes, textures })
    }
}
