//! Small 3D helpers: the hand-rolled perspective used by the Canvas 2D
//! scenes, the drag/auto-rotate orbit they share, and the visible extent of
//! the WebGL perspective camera.

use glam::{Vec2, Vec3};

use crate::config::{CameraConfig, OrbitConfig};

/// Rotates around Y by `ry`, then around X by `rx`.
pub fn rotate(v: Vec3, rx: f32, ry: f32) -> Vec3 {
    let (sin_x, cos_x) = rx.sin_cos();
    let (sin_y, cos_y) = ry.sin_cos();

    let x1 = v.x * cos_y - v.z * sin_y;
    let z1 = v.x * sin_y + v.z * cos_y;

    let y1 = v.y * cos_x - z1 * sin_x;
    let z2 = v.y * sin_x + z1 * cos_x;
    Vec3::new(x1, y1, z2)
}

/// A point after perspective division, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    /// Depth after rotation; larger is farther away.
    pub z: f32,
    pub scale: f32,
}

impl Projected {
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Points at or past the eye plane are not drawn.
    pub fn is_visible(&self, perspective: f32) -> bool {
        self.z > -perspective
    }
}

/// Perspective projection onto a canvas centred at `center`.
pub fn project(v: Vec3, perspective: f32, center: Vec2) -> Projected {
    let scale = perspective / (perspective + v.z);
    Projected {
        x: v.x * scale + center.x,
        y: v.y * scale + center.y,
        z: v.z,
        scale,
    }
}

/// Rotation that eases toward a target driven by pointer drags, with a slow
/// spin while idle.
#[derive(Debug, Clone)]
pub struct Orbit {
    pub rotation: Vec2,
    target: Vec2,
    dragging: bool,
    last_pointer: Vec2,
    ease: f32,
    sensitivity: f32,
    auto_rotate: f32,
}

impl Orbit {
    pub fn new(config: &OrbitConfig) -> Self {
        let start = Vec2::new(config.initial_tilt, 0.0);
        Self {
            rotation: start,
            target: start,
            dragging: false,
            last_pointer: Vec2::ZERO,
            ease: config.ease,
            sensitivity: config.drag_sensitivity,
            auto_rotate: config.auto_rotate,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Pointer moved to `pointer`. Horizontal drag turns around Y, vertical
    /// around X.
    pub fn pointer_moved(&mut self, pointer: Vec2) {
        if self.dragging {
            let delta = pointer - self.last_pointer;
            self.target.y += delta.x * self.sensitivity;
            self.target.x += delta.y * self.sensitivity;
        }
        self.last_pointer = pointer;
    }

    pub fn tick(&mut self) {
        self.rotation += (self.target - self.rotation) * self.ease;
        if !self.dragging {
            self.target.y += self.auto_rotate;
        }
    }

    pub fn rotate(&self, v: Vec3) -> Vec3 {
        rotate(v, self.rotation.x, self.rotation.y)
    }
}

/// World-space extent visible at the origin plane of a perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn from_camera(camera: &CameraConfig, aspect: f32) -> Self {
        let fov = camera.fov_degrees.to_radians();
        let height = 2.0 * (fov / 2.0).tan() * camera.distance;
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Self {
            width: height * aspect,
            height,
        }
    }

    /// Distance from the origin at which spawned particles appear.
    pub fn edge_distance(&self) -> f32 {
        self.width.max(self.height) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn quarter_turn_about_y() {
        let v = rotate(Vec3::X, 0.0, FRAC_PI_2);
        assert!(close(v, Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn quarter_turn_about_x() {
        let v = rotate(Vec3::Y, FRAC_PI_2, 0.0);
        assert!(close(v, Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn projection_shrinks_with_depth() {
        let center = Vec2::new(400.0, 300.0);
        let near = project(Vec3::new(100.0, 0.0, 0.0), 800.0, center);
        let far = project(Vec3::new(100.0, 0.0, 800.0), 800.0, center);
        assert_eq!(near.x, 500.0);
        assert_eq!(far.x, 450.0);
        assert_eq!(far.scale, 0.5);
        assert!(far.is_visible(800.0));
        assert!(!project(Vec3::new(0.0, 0.0, -900.0), 800.0, center).is_visible(800.0));
    }

    #[test]
    fn drag_moves_target_and_stops_auto_rotate() {
        let mut orbit = Orbit::new(&OrbitConfig::default());
        orbit.pointer_moved(Vec2::new(10.0, 10.0));
        orbit.begin_drag();
        orbit.pointer_moved(Vec2::new(30.0, 0.0));
        assert!((orbit.target().y - 0.2).abs() < 1e-6);
        assert!((orbit.target().x + 0.1).abs() < 1e-6);

        let before = orbit.target();
        orbit.tick();
        assert_eq!(orbit.target(), before);

        orbit.end_drag();
        orbit.tick();
        assert!(orbit.target().y > before.y);
    }

    #[test]
    fn rotation_eases_toward_target() {
        let mut orbit = Orbit::new(&OrbitConfig {
            auto_rotate: 0.0,
            ..OrbitConfig::default()
        });
        orbit.begin_drag();
        orbit.pointer_moved(Vec2::new(100.0, 0.0));
        orbit.tick();
        assert!((orbit.rotation.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn viewport_matches_camera_frustum() {
        let viewport = Viewport::from_camera(&CameraConfig::default(), 2.0);
        let expected = 2.0 * (37.5f32).to_radians().tan() * 55.0;
        assert!((viewport.height - expected).abs() < 1e-3);
        assert!((viewport.width - expected * 2.0).abs() < 1e-3);
        assert!((viewport.edge_distance() - expected).abs() < 1e-3);
    }

    #[test]
    fn degenerate_aspect_falls_back_to_square() {
        let viewport = Viewport::from_camera(&CameraConfig::default(), f32::NAN);
        assert_eq!(viewport.width, viewport.height);
    }
}
