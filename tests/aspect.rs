#![cfg(not(target_arch = "wasm32"))]

use glam::{Vec2, Vec3};
use portfolio_viz::config::CameraConfig;
use portfolio_viz::projection::{project, rotate, Viewport};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[test]
fn visible_height_does_not_depend_on_aspect() {
    let camera = CameraConfig::default();
    let wide = Viewport::from_camera(&camera, 1920.0 / 1080.0);
    let tall = Viewport::from_camera(&camera, 1080.0 / 1920.0);

    assert!(approx_eq(wide.height, tall.height, 1e-4));
    assert!(wide.width > wide.height);
    assert!(tall.width < tall.height);
    // Spawn edge follows the longer side.
    assert!(approx_eq(wide.edge_distance(), wide.width / 2.0, 1e-4));
    assert!(approx_eq(tall.edge_distance(), tall.height / 2.0, 1e-4));
}

#[test]
fn projection_is_translation_of_canvas_centre() {
    let samples = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(60.0, 0.0, 0.0),
        Vec3::new(0.0, 60.0, 120.0),
        Vec3::new(-80.0, 40.0, -200.0),
    ];
    let rot = std::f32::consts::PI / 6.0;

    for v in samples {
        let v = rotate(v, rot, rot);
        let a = project(v, 800.0, Vec2::new(960.0, 540.0));
        let b = project(v, 800.0, Vec2::new(540.0, 960.0));
        assert!(approx_eq(a.x - 960.0, b.x - 540.0, 1e-3), "a={a:?} b={b:?}");
        assert!(approx_eq(a.y - 540.0, b.y - 960.0, 1e-3), "a={a:?} b={b:?}");
        assert_eq!(a.scale, b.scale);
    }
}

#[test]
fn rotation_preserves_length() {
    for (rx, ry) in [(0.3, 1.2), (-2.0, 0.5), (3.0, -3.0)] {
        let v = Vec3::new(3.0, -4.0, 12.0);
        assert!(approx_eq(rotate(v, rx, ry).length(), 13.0, 1e-4));
    }
}
