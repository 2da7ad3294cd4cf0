use glam::{Mat4, Vec3};

/// Composes an object-to-world matrix.
///
/// Starts from identity; every step post-multiplies, so the step added last
/// is applied to the vertex first.
#[derive(Debug, Copy, Clone)]
pub struct TransformBuilder {
    matrix: Mat4,
}

impl Default for TransformBuilder {
    fn default() -> Self {
        Self { matrix: Mat4::IDENTITY }
    }
}

impl TransformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(self, offset: Vec3) -> Self {
        self.then(Mat4::from_translation(offset))
    }

    pub fn with_scale(self, scale: Vec3) -> Self {
        self.then(Mat4::from_scale(scale))
    }

    pub fn with_rotation_x(self, radians: f32) -> Self {
        self.then(Mat4::from_rotation_x(radians))
    }

    pub fn with_rotation_y(self, radians: f32) -> Self {
        self.then(Mat4::from_rotation_y(radians))
    }

    pub fn with_rotation_z(self, radians: f32) -> Self {
        self.then(Mat4::from_rotation_z(radians))
    }

    pub fn build(self) -> Mat4 {
        self.matrix
    }

    fn then(self, step: Mat4) -> Self {
        Self {
            matrix: self.matrix * step,
        }
    }
}
