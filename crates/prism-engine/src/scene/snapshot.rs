use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::resource::{Mesh, ResourceError, ResourceManager};

use super::Camera;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("scene has no camera")]
    NoCamera,
}

/// Matrix that carries object-space normals to world space.
pub fn normal_matrix(transform: Mat4) -> Mat4 {
    transform.inverse().transpose()
}

/// Per-object arrays; index `i` describes the same object in every one.
#[derive(Debug, Clone, Default)]
struct Objects {
    meshes: Vec<Arc<Mesh>>,
    transforms: Vec<Mat4>,
    normals: Vec<Mat4>,
    colors: Vec<Vec3>,
}

impl Objects {
    fn push(&mut self, mesh: Arc<Mesh>, transform: Mat4, color: Vec3) {
        self.meshes.push(mesh);
        self.transforms.push(transform);
        self.normals.push(normal_matrix(transform));
        self.colors.push(color);
    }
}

/// Cameras plus the objects to draw.
///
/// Object data is frozen at build time. Only the active camera (the first one
/// added) can be mutated afterwards.
#[derive(Debug)]
pub struct Scene {
    cameras: Vec<Camera>,
    objects: Objects,
}

impl Scene {
    pub fn active_camera(&self) -> &Camera {
        &self.cameras[0]
    }

    pub fn active_camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[0]
    }

    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.objects.meshes
    }

    pub fn transforms(&self) -> &[Mat4] {
        &self.objects.transforms
    }

    pub fn normals(&self) -> &[Mat4] {
        &self.objects.normals
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.objects.colors
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.meshes.is_empty()
    }
}

/// Fluent construction of a [`Scene`] against a loaded resource registry.
pub struct SceneBuilder<'r, K = String> {
    resources: &'r ResourceManager<K>,
    cameras: Vec<Camera>,
    objects: Objects,
}

impl<'r, K> SceneBuilder<'r, K>
where
    K: Eq + Hash + fmt::Debug,
{
    pub fn new(resources: &'r ResourceManager<K>) -> Self {
        Self {
            resources,
            cameras: Vec::new(),
            objects: Objects::default(),
        }
    }

    /// Adds a camera. The first camera added is the active one.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.cameras.push(camera);
        self
    }

    /// Adds an object drawing the mesh registered under `mesh`.
    ///
    /// The normal matrix is derived from `transform`.
    pub fn with_object<Q>(mut self, mesh: &Q, transform: Mat4, color: Vec3) -> Result<Self, SceneError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let mesh = Arc::clone(self.resources.mesh(mesh)?);
        self.objects.push(mesh, transform, color);
        Ok(self)
    }

    pub fn build(self) -> Result<Scene, SceneError> {
        if self.cameras.is_empty() {
            return Err(SceneError::NoCamera);
        }

        log::debug!(
            "scene built: {} objects, {} cameras",
            self.objects.meshes.len(),
            self.cameras.len()
        );

        Ok(Scene {
            cameras: self.cameras,
            objects: self.objects,
        })
    }
}
