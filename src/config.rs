//! Tuning constants for the three visualizations.
//!
//! Every field has a default matching the hand-tuned look of the page. A page
//! can override any subset by embedding a JSON document; missing fields keep
//! their defaults and unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Direction a freshly spawned particle travels relative to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    /// Toward the focal sphere.
    #[default]
    Inward,
    /// Away from the focal sphere.
    Outward,
}

/// Constants for the Infinity technique (spawn/kinematic integrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfinityConfig {
    /// Focal sphere radius.
    pub sphere_radius: f32,
    /// Particles spawned over one full spawn window.
    pub total_particles: usize,
    /// Seconds to spawn `total_particles`.
    pub spawn_duration: f32,
    /// Units per frame outside the focal sphere.
    pub approach_speed: f32,
    /// Fraction of the radius at or below which particles stop.
    pub stop_threshold: f32,
    /// Exponent of the slowdown curve inside the sphere.
    pub slowdown_power: i32,
    /// Absolute distance below which particles stop.
    pub min_stop_distance: f32,
    pub brightness_outside: f32,
    pub brightness_inside: f32,
    pub particle_size: f32,
    pub tint: [f32; 3],
    pub heading: Heading,
}

impl Default for InfinityConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 20.0,
            total_particles: 2000,
            spawn_duration: 20.0,
            approach_speed: 5.0,
            stop_threshold: 0.95,
            slowdown_power: 12,
            min_stop_distance: 5.0,
            brightness_outside: 0.4,
            brightness_inside: 1.0,
            particle_size: 0.7,
            tint: [0.12, 0.12, 0.25],
            heading: Heading::Inward,
        }
    }
}

impl InfinityConfig {
    /// Particles activated per second of mode time.
    pub fn spawn_rate(&self) -> f32 {
        if self.spawn_duration <= 0.0 {
            return self.total_particles as f32;
        }
        self.total_particles as f32 / self.spawn_duration
    }
}

/// Fade-trail and comet-trail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Fade the previous frame instead of clearing it.
    pub fade_enabled: bool,
    /// Opacity of the black overlay drawn each frame; higher fades faster.
    pub fade_alpha: f32,
    pub comet_enabled: bool,
    pub comet_opacity: f32,
    /// Multiplier on the per-frame delta used as tail length.
    pub comet_stretch: f32,
    /// Tails shorter than this collapse to a point.
    pub comet_min_len: f32,
    pub comet_max_particles: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            fade_enabled: true,
            fade_alpha: 0.045,
            comet_enabled: true,
            comet_opacity: 0.35,
            comet_stretch: 10.0,
            comet_min_len: 0.15,
            comet_max_particles: 2500,
        }
    }
}

/// Whole-cloud rotation rates, in radians per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Slow pan around Y while Infinity runs.
    pub pan_rot_y: f32,
    /// Scales the Blue, Red and Purple spins.
    pub rot_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            pan_rot_y: 0.0012,
            rot_scale: 0.35,
        }
    }
}

/// Perspective camera looking down -Z at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    /// Depth of the box particles spawn in.
    pub spawn_depth: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            distance: 55.0,
            near: 0.1,
            far: 1000.0,
            spawn_depth: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitlessConfig {
    /// Fixed particle capacity.
    pub count: usize,
    pub infinity: InfinityConfig,
    pub trails: TrailConfig,
    pub motion: MotionConfig,
    pub camera: CameraConfig,
}

impl Default for LimitlessConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            infinity: InfinityConfig::default(),
            trails: TrailConfig::default(),
            motion: MotionConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// Orbit camera behaviour shared by the two Canvas 2D scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub initial_tilt: f32,
    /// Fraction of the remaining rotation closed each frame.
    pub ease: f32,
    /// Radians per pixel of drag.
    pub drag_sensitivity: f32,
    /// Radians added to the Y target each frame while idle.
    pub auto_rotate: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            initial_tilt: 0.0,
            ease: 0.1,
            drag_sensitivity: 0.01,
            auto_rotate: 0.002,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuralConfig {
    pub layers: Vec<usize>,
    pub perspective: f32,
    pub depth_spacing: f32,
    /// Pointer distance at which activation falls to zero.
    pub activation_radius: f32,
    pub activation_ease: f32,
    /// Projected distance within which a click hits a neuron.
    pub click_radius: f32,
    pub orbit: OrbitConfig,
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            layers: vec![4, 6, 6, 4],
            perspective: 800.0,
            depth_spacing: 200.0,
            activation_radius: 250.0,
            activation_ease: 0.12,
            click_radius: 50.0,
            orbit: OrbitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumConfig {
    pub perspective: f32,
    /// Vertical offset of the sphere centre below the canvas middle.
    pub center_offset_y: f32,
    /// Sphere radius as a fraction of the shorter canvas side.
    pub radius_fraction: f32,
    /// Chance per frame of a new surface particle.
    pub particle_chance: f32,
    pub trail_length: usize,
    pub orbit: OrbitConfig,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            perspective: 1200.0,
            center_offset_y: 120.0,
            radius_fraction: 0.28,
            particle_chance: 0.3,
            trail_length: 15,
            orbit: OrbitConfig {
                initial_tilt: 0.4,
                ease: 0.08,
                drag_sensitivity: 0.015,
                auto_rotate: 0.003,
            },
        }
    }
}

/// Top-level config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub limitless: LimitlessConfig,
    pub neural: NeuralConfig,
    pub quantum: QuantumConfig,
    /// Fixed seed for reproducible particle layouts; random when absent.
    pub seed: Option<u64>,
}

impl VizConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = VizConfig::from_json("{}").unwrap();
        assert_eq!(config, VizConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = VizConfig::from_json(
            r#"{"limitless": {"infinity": {"sphere_radius": 12.5, "heading": "outward"}}, "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(config.limitless.infinity.sphere_radius, 12.5);
        assert_eq!(config.limitless.infinity.heading, Heading::Outward);
        assert_eq!(config.limitless.infinity.total_particles, 2000);
        assert_eq!(config.limitless.count, 15_000);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config = VizConfig::from_json(r#"{"theme": "nord", "neural": {"extra": 1}}"#).unwrap();
        assert_eq!(config.neural.layers, vec![4, 6, 6, 4]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(VizConfig::from_json("{\"seed\": \"x\"}").is_err());
    }

    #[test]
    fn spawn_rate_from_window() {
        let infinity = InfinityConfig::default();
        assert_eq!(infinity.spawn_rate(), 100.0);
    }
}
