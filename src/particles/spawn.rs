//! Spawn-scheduled kinematics for the Infinity technique.
//!
//! Slots activate one after another as mode time advances. An activated slot
//! is launched from a random viewport edge along a fixed unit direction, then
//! each frame its speed is shaped by its distance to the focal sphere: full
//! speed outside, a steep power-law falloff just inside, and a hard stop past
//! the stop threshold. Brightness follows the same distance.

use glam::Vec3;
use rand::Rng;

use super::buffer::{ParticleBuffer, Slot};
use crate::config::{Heading, InfinityConfig};
use crate::projection::Viewport;

/// Lifecycle of one slot under the spawn integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPhase {
    /// Not yet eligible or not yet launched. The slot is all zeros.
    #[default]
    Dormant,
    /// Launched and travelling along its direction.
    Moving,
    /// Stopped for good at the focal sphere.
    Settled,
}

/// Number of slots eligible after `elapsed` seconds of mode time.
pub fn active_count(elapsed: f64, rate: f32, total: usize, capacity: usize) -> usize {
    let cap = total.min(capacity);
    if elapsed <= 0.0 || rate <= 0.0 {
        return 0;
    }
    let spawned = (elapsed * f64::from(rate)).floor();
    if spawned >= cap as f64 {
        cap
    } else {
        spawned as usize
    }
}

/// Per-frame speed of a slot at distance `d` from the origin.
pub fn speed_at(d: f32, config: &InfinityConfig) -> f32 {
    let radius = config.sphere_radius;
    if d > radius {
        return config.approach_speed;
    }
    if d <= radius * config.stop_threshold || d < config.min_stop_distance {
        return 0.0;
    }
    0.1 * (d / radius).powi(config.slowdown_power)
}

/// Brightness of a slot at distance `d`: dim outside the sphere, brighter
/// toward the centre inside it.
pub fn brightness_at(d: f32, config: &InfinityConfig) -> f32 {
    let radius = config.sphere_radius;
    let outside = config.brightness_outside;
    if d > radius {
        return outside;
    }
    outside + (config.brightness_inside - outside) * (1.0 - d / radius)
}

fn lit_slot(position: Vec3, brightness: f32, config: &InfinityConfig) -> Slot {
    Slot::new(
        position,
        Vec3::from_array(config.tint) * brightness,
        brightness * config.particle_size,
    )
}

/// Random point on one of the four viewport edges, with depth jitter.
pub fn spawn_point<R: Rng + ?Sized>(viewport: &Viewport, depth: f32, rng: &mut R) -> Vec3 {
    let edge = viewport.edge_distance();
    let mut jitter = |span: f32| (rng.gen::<f32>() - 0.5) * span;

    let side = jitter(1.0) + 0.5;
    let (x, y) = if side < 0.25 {
        (-edge, jitter(viewport.height))
    } else if side < 0.5 {
        (edge, jitter(viewport.height))
    } else if side < 0.75 {
        (jitter(viewport.width), edge)
    } else {
        (jitter(viewport.width), -edge)
    };
    let z = jitter(depth) + jitter(depth);
    Vec3::new(x, y, z)
}

/// Per-slot kinematic state for the spawn integrator.
///
/// Directions live here rather than in the ease target field so switching
/// techniques mid-flight can never reinterpret one as the other.
#[derive(Debug, Clone)]
pub struct SpawnField {
    directions: Vec<Vec3>,
    phases: Vec<SlotPhase>,
    active: usize,
}

impl SpawnField {
    pub fn new(len: usize) -> Self {
        Self {
            directions: vec![Vec3::ZERO; len],
            phases: vec![SlotPhase::Dormant; len],
            active: 0,
        }
    }

    pub fn reset(&mut self) {
        self.directions.fill(Vec3::ZERO);
        self.phases.fill(SlotPhase::Dormant);
        self.active = 0;
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn phase(&self, i: usize) -> SlotPhase {
        self.phases[i]
    }

    pub fn direction(&self, i: usize) -> Vec3 {
        self.directions[i]
    }

    /// Advances every slot one frame.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        buffer: &mut ParticleBuffer,
        config: &InfinityConfig,
        elapsed: f64,
        viewport: &Viewport,
        depth: f32,
        rng: &mut R,
    ) {
        let active = active_count(elapsed, config.spawn_rate(), config.total_particles, buffer.len());
        self.active = self.active.max(active);

        for i in 0..buffer.len() {
            if i >= self.active {
                self.phases[i] = SlotPhase::Dormant;
                buffer.zero_slot(i);
                continue;
            }
            match self.phases[i] {
                SlotPhase::Dormant => self.launch(i, buffer, config, viewport, depth, rng),
                SlotPhase::Moving => self.advance(i, buffer, config),
                SlotPhase::Settled => {}
            }
        }
    }

    fn launch<R: Rng + ?Sized>(
        &mut self,
        i: usize,
        buffer: &mut ParticleBuffer,
        config: &InfinityConfig,
        viewport: &Viewport,
        depth: f32,
        rng: &mut R,
    ) {
        let origin = spawn_point(viewport, depth, rng);
        let outward = origin.normalize_or_zero();
        self.directions[i] = match config.heading {
            Heading::Inward => -outward,
            Heading::Outward => outward,
        };
        self.phases[i] = SlotPhase::Moving;
        buffer.set(i, lit_slot(origin, config.brightness_outside, config));
    }

    fn advance(&mut self, i: usize, buffer: &mut ParticleBuffer, config: &InfinityConfig) {
        let mut position = buffer.position(i);
        let speed = speed_at(position.length(), config);
        if speed > 0.0 {
            position += self.directions[i] * speed;
        } else {
            self.phases[i] = SlotPhase::Settled;
        }
        let brightness = brightness_at(position.length(), config);
        buffer.set(i, lit_slot(position, brightness, config));
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, i: usize, buffer: &mut ParticleBuffer, position: Vec3, direction: Vec3) {
        self.directions[i] = direction;
        self.phases[i] = SlotPhase::Moving;
        buffer.set_position(i, position);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::CameraConfig;

    fn viewport() -> Viewport {
        Viewport::from_camera(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn two_seconds_at_one_hundred_per_second() {
        assert_eq!(active_count(2.0, 100.0, 2000, 15_000), 200);
    }

    #[test]
    fn active_count_is_clamped() {
        assert_eq!(active_count(-1.0, 100.0, 2000, 15_000), 0);
        assert_eq!(active_count(1e6, 100.0, 2000, 15_000), 2000);
        assert_eq!(active_count(1e6, 100.0, 2000, 50), 50);
    }

    #[test]
    fn stops_at_threshold() {
        let config = InfinityConfig::default();
        assert_eq!(speed_at(19.0, &config), 0.0);
        assert_eq!(speed_at(4.0, &config), 0.0);
        assert_eq!(speed_at(25.0, &config), config.approach_speed);
        let edge = speed_at(19.9, &config);
        assert!(edge > 0.0 && edge < 0.1);
    }

    #[test]
    fn brightness_ramps_inside_sphere() {
        let config = InfinityConfig::default();
        assert_eq!(brightness_at(50.0, &config), 0.4);
        assert_eq!(brightness_at(20.0, &config), 0.4);
        assert!((brightness_at(10.0, &config) - 0.7).abs() < 1e-6);
        assert!((brightness_at(0.0, &config) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn slot_inside_threshold_does_not_move() {
        let config = InfinityConfig::default();
        let mut buffer = ParticleBuffer::new(4);
        let mut field = SpawnField::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        field.place(0, &mut buffer, Vec3::new(19.0, 0.0, 0.0), Vec3::NEG_X);

        // 0.015 s at 100/s keeps exactly one slot eligible.
        field.step(&mut buffer, &config, 0.015, &viewport(), 150.0, &mut rng);
        assert_eq!(buffer.position(0), Vec3::new(19.0, 0.0, 0.0));
        assert_eq!(field.phase(0), SlotPhase::Settled);
    }

    #[test]
    fn slot_settled_near_the_origin_is_never_respawned() {
        let config = InfinityConfig::default();
        let mut buffer = ParticleBuffer::new(1);
        let mut field = SpawnField::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let near = Vec3::new(0.5, 0.0, 0.0);
        field.place(0, &mut buffer, near, Vec3::NEG_X);

        for frame in 0..5 {
            field.step(&mut buffer, &config, 1.0 + frame as f64, &viewport(), 150.0, &mut rng);
            assert_eq!(field.phase(0), SlotPhase::Settled);
            assert_eq!(buffer.position(0), near);
        }
        assert_eq!(field.active_count(), 1);
    }

    #[test]
    fn launched_slots_head_for_the_origin() {
        let config = InfinityConfig::default();
        let mut buffer = ParticleBuffer::new(8);
        let mut field = SpawnField::new(8);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        field.step(&mut buffer, &config, 0.055, &viewport(), 150.0, &mut rng);

        assert_eq!(field.active_count(), 5);
        for i in 0..5 {
            assert_eq!(field.phase(i), SlotPhase::Moving);
            let p = buffer.position(i);
            let d = field.direction(i);
            assert!((d.length() - 1.0).abs() < 1e-5);
            assert!((p.normalize() + d).length() < 1e-5);
            assert!((buffer.size(i) - 0.4 * 0.7).abs() < 1e-6);
        }
        for i in 5..8 {
            assert!(buffer.is_slot_zero(i));
        }

        let before = buffer.distance_from_origin(0);
        field.step(&mut buffer, &config, 0.055, &viewport(), 150.0, &mut rng);
        assert!((before - buffer.distance_from_origin(0) - config.approach_speed).abs() < 1e-3);
    }

    #[test]
    fn outward_heading_points_away() {
        let config = InfinityConfig {
            heading: Heading::Outward,
            ..InfinityConfig::default()
        };
        let mut buffer = ParticleBuffer::new(1);
        let mut field = SpawnField::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        field.step(&mut buffer, &config, 1.0, &viewport(), 150.0, &mut rng);
        let p = buffer.position(0);
        assert!((p.normalize() - field.direction(0)).length() < 1e-5);
    }

    #[test]
    fn particles_settle_on_the_sphere() {
        let config = InfinityConfig::default();
        let mut buffer = ParticleBuffer::new(1);
        let mut field = SpawnField::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            field.step(&mut buffer, &config, 1.0, &viewport(), 150.0, &mut rng);
        }
        assert_eq!(field.phase(0), SlotPhase::Settled);
        let d = buffer.distance_from_origin(0);
        assert!(d <= config.sphere_radius && d > config.min_stop_distance - config.approach_speed);
    }

    #[test]
    fn reset_returns_every_slot_to_dormant() {
        let config = InfinityConfig::default();
        let mut buffer = ParticleBuffer::new(4);
        let mut field = SpawnField::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        field.step(&mut buffer, &config, 10.0, &viewport(), 150.0, &mut rng);
        field.reset();
        assert_eq!(field.active_count(), 0);
        assert!((0..4).all(|i| field.phase(i) == SlotPhase::Dormant));
    }
}
