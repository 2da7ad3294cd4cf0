use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// World up axis. The scene is Z-up.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Polar angle margin kept from each pole.
pub const THETA_MARGIN: f32 = PI / 32.0;

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1.0e4;

/// Direction expressed as azimuth `phi` (around +Z, from +X) and polar angle
/// `theta` (from +Z).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub phi: f32,
    pub theta: f32,
}

/// Converts a unit direction into spherical angles.
pub fn cartesian_to_spherical(direction: Vec3) -> Spherical {
    Spherical {
        phi: direction.y.atan2(direction.x),
        theta: direction.z.clamp(-1.0, 1.0).acos(),
    }
}

/// Converts spherical angles into a unit direction.
pub fn spherical_to_cartesian(s: Spherical) -> Vec3 {
    let (sin_theta, cos_theta) = s.theta.sin_cos();
    let (sin_phi, cos_phi) = s.phi.sin_cos();
    Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/// Free-flying camera steered by spherical angles.
///
/// Orientation is stored as `(phi, theta)` rather than as a raw direction, so
/// incremental rotation does not accumulate normalization drift. Every
/// mutation recomputes the cached forward vector and view matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    forward: Vec3,
    angles: Spherical,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    fn from_builder(b: CameraBuilder) -> Self {
        // A degenerate look-at (eye == target) has no direction; look along +X.
        let forward = (b.target - b.eye).try_normalize().unwrap_or(Vec3::X);

        Self {
            eye: b.eye,
            forward,
            angles: cartesian_to_spherical(forward),
            view: b.view,
            projection: b.projection,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn phi(&self) -> f32 {
        self.angles.phi
    }

    pub fn theta(&self) -> f32 {
        self.angles.theta
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// `projection * view`, computed on every call.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Moves the eye along the forward vector; negative values move backwards.
    pub fn move_forwards(&mut self, velocity: f32) {
        self.eye += self.forward * velocity;
        self.update_view();
    }

    /// Rotates around the world up axis. Unclamped.
    pub fn adjust_phi(&mut self, radians: f32) {
        self.angles.phi += radians;
        self.update_view();
    }

    /// Tilts towards or away from the poles, clamped to
    /// `[THETA_MARGIN, PI - THETA_MARGIN]`.
    pub fn adjust_theta(&mut self, radians: f32) {
        self.angles.theta = (self.angles.theta + radians).clamp(THETA_MARGIN, PI - THETA_MARGIN);
        self.update_view();
    }

    fn update_view(&mut self) {
        self.forward = spherical_to_cartesian(self.angles);
        self.view = Mat4::look_at_rh(self.eye, self.eye + self.forward, WORLD_UP);
    }
}

/// Fluent construction of a [`Camera`].
#[derive(Debug, Clone)]
pub struct CameraBuilder {
    eye: Vec3,
    target: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::ZERO,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl CameraBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_look_at(mut self, eye: Vec3, target: Vec3) -> Self {
        self.eye = eye;
        self.target = target;
        self.view = Mat4::look_at_rh(eye, target, WORLD_UP);
        self
    }

    /// 45° vertical field of view, depth range 0..1.
    pub fn with_perspective(mut self, aspect: f32) -> Self {
        self.projection =
            Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR_PLANE, FAR_PLANE);
        self
    }

    pub fn build(self) -> Camera {
        Camera::from_builder(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const EPS: f32 = 1e-5;

    fn orbit_camera() -> Camera {
        CameraBuilder::new()
            .with_look_at(Vec3::splat(4.0), Vec3::ZERO)
            .with_perspective(16.0 / 9.0)
            .build()
    }

    fn assert_theta_in_bounds(camera: &Camera) {
        assert!(camera.theta() >= THETA_MARGIN, "theta {} below bound", camera.theta());
        assert!(camera.theta() <= PI - THETA_MARGIN, "theta {} above bound", camera.theta());
    }

    // ── spherical coordinates ─────────────────────────────────────────────

    #[test]
    fn forward_round_trips_through_spherical() {
        let camera = orbit_camera();
        let expected = (-Vec3::splat(4.0)).normalize();

        assert!(camera.forward().abs_diff_eq(expected, EPS));
        let back = spherical_to_cartesian(cartesian_to_spherical(camera.forward()));
        assert!(back.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn spherical_axes() {
        let up = spherical_to_cartesian(Spherical { phi: 0.0, theta: 0.0 });
        assert!(up.abs_diff_eq(Vec3::Z, EPS));

        let s = cartesian_to_spherical(Vec3::Y);
        assert_abs_diff_eq!(s.phi, PI / 2.0, epsilon = EPS);
        assert_abs_diff_eq!(s.theta, PI / 2.0, epsilon = EPS);
    }

    // ── view / projection ─────────────────────────────────────────────────

    #[test]
    fn initial_view_projection_is_projection_times_view() {
        let camera = orbit_camera();
        let expected = camera.projection() * Mat4::look_at_rh(Vec3::splat(4.0), Vec3::ZERO, Vec3::Z);
        assert!(camera.view_projection().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn view_projection_is_fresh_after_every_mutation() {
        let mut camera = orbit_camera();

        camera.move_forwards(0.5);
        camera.adjust_phi(0.3);
        camera.adjust_theta(-0.2);

        let target = camera.eye() + camera.forward();
        let view = Mat4::look_at_rh(camera.eye(), target, Vec3::Z);
        assert!(camera.view().abs_diff_eq(view, EPS));
        assert!(camera.view_projection().abs_diff_eq(camera.projection() * view, EPS));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = orbit_camera();
        let clip = camera.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;

        assert_abs_diff_eq!(ndc.x, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(ndc.y, 0.0, epsilon = EPS);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn move_forwards_is_signed() {
        let mut camera = orbit_camera();
        let start = camera.eye();

        camera.move_forwards(1.0);
        assert!(camera.eye().abs_diff_eq(start + camera.forward(), EPS));

        camera.move_forwards(-1.0);
        assert!(camera.eye().abs_diff_eq(start, EPS));
    }

    #[test]
    fn phi_is_unclamped() {
        let mut camera = orbit_camera();
        let phi = camera.phi();

        camera.adjust_phi(10.0 * PI);
        assert_abs_diff_eq!(camera.phi(), phi + 10.0 * PI, epsilon = 1e-4);
        // A whole number of turns leaves the direction unchanged.
        assert!(camera.forward().abs_diff_eq((-Vec3::splat(4.0)).normalize(), 1e-4));
    }

    #[test]
    fn theta_stays_inside_the_pole_margin() {
        let mut camera = orbit_camera();

        for delta in [0.04, -0.04, 3.0, -7.5, 100.0, -100.0, f32::MAX, -f32::MAX] {
            camera.adjust_theta(delta);
            assert_theta_in_bounds(&camera);
        }

        camera.adjust_theta(-10.0);
        assert_abs_diff_eq!(camera.theta(), THETA_MARGIN);
        camera.adjust_theta(10.0);
        assert_abs_diff_eq!(camera.theta(), PI - THETA_MARGIN);
    }

    #[test]
    fn mixed_sequences_keep_theta_bounded() {
        let mut camera = orbit_camera();

        for i in 0..500 {
            match i % 3 {
                0 => camera.move_forwards(if i % 2 == 0 { 0.1 } else { -0.1 }),
                1 => camera.adjust_phi(0.04 * i as f32),
                _ => camera.adjust_theta(if i % 5 == 0 { -0.9 } else { 0.3 }),
            }
            if i % 3 == 2 {
                assert_theta_in_bounds(&camera);
            }
        }
    }

    #[test]
    fn degenerate_look_at_falls_back_to_x() {
        let camera = CameraBuilder::new().with_look_at(Vec3::ONE, Vec3::ONE).build();
        assert_eq!(camera.forward(), Vec3::X);
        assert!(camera.theta().is_finite() && camera.phi().is_finite());
    }
}
