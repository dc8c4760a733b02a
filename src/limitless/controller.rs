use glam::Vec3;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::fields;
use super::technique::{Behavior, Integrator, Refresh, Rotation, Technique};
use crate::clock::ModeClock;
use crate::config::LimitlessConfig;
use crate::particles::{ease_toward, CometTrails, ParticleBuffer, SpawnField, TargetField};
use crate::projection::Viewport;

/// Void advances its own clock by a fixed step per drawn frame.
const VOID_FRAME_STEP: f32 = 0.016;

/// How the presenter should treat the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Overlay translucent black so moving particles leave trails.
    Fade,
    /// Wipe to the background colour.
    Clear,
}

/// What the presenter needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub clear: ClearPolicy,
    pub point_size: f32,
    pub opaque_background: bool,
    /// Comet segments to draw; zero hides the trail geometry.
    pub trail_segments: usize,
}

/// Animation context of one Limitless canvas.
///
/// Owns every buffer the per-frame update touches. The page creates one
/// instance per canvas and feeds it the frame timestamp and surface aspect.
pub struct LimitlessField {
    config: LimitlessConfig,
    technique: Technique,
    active: bool,
    buffer: ParticleBuffer,
    targets: TargetField,
    spawn: SpawnField,
    trails: CometTrails,
    rotation: Vec3,
    clock: ModeClock,
    void_time: f32,
    rng: ChaCha8Rng,
}

impl LimitlessField {
    /// Starts on Infinity, inactive, with nothing spawned.
    pub fn new(config: LimitlessConfig, seed: u64) -> Self {
        let count = config.count;
        let comet_capacity = if config.trails.comet_enabled {
            config.trails.comet_max_particles.min(count)
        } else {
            0
        };
        let mut field = Self {
            technique: Technique::Infinity,
            active: false,
            buffer: ParticleBuffer::new(count),
            targets: TargetField::new(count),
            spawn: SpawnField::new(count),
            trails: CometTrails::new(comet_capacity),
            rotation: Vec3::ZERO,
            clock: ModeClock::new(),
            void_time: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
        };
        field.enter(Technique::Infinity);
        field
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn display_name(&self) -> &'static str {
        self.technique.display_name()
    }

    pub fn behavior(&self) -> Behavior {
        self.technique.behavior(&self.config.motion)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn targets(&self) -> &TargetField {
        &self.targets
    }

    pub fn trails(&self) -> &CometTrails {
        &self.trails
    }

    pub fn spawn(&self) -> &SpawnField {
        &self.spawn
    }

    /// Euler angles (XYZ) of the whole cloud.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn active_count(&self) -> usize {
        self.spawn.active_count()
    }

    pub fn clock(&self) -> &ModeClock {
        &self.clock
    }

    pub fn config(&self) -> &LimitlessConfig {
        &self.config
    }

    pub fn select(&mut self, technique: Technique) {
        debug!("limitless: {:?} -> {:?}", self.technique, technique);
        self.enter(technique);
    }

    pub fn step(&mut self, direction: i32) {
        self.select(self.technique.step(direction));
    }

    /// Called when the containing panel is shown or hidden. The mode clock
    /// only runs while active; showing the panel again restarts a
    /// reset-on-entry technique from empty.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            if self.behavior().reset_on_entry {
                self.enter(self.technique);
            }
        } else {
            self.clock.reset();
        }
    }

    fn enter(&mut self, technique: Technique) {
        self.technique = technique;
        self.clock.reset();
        let behavior = self.behavior();

        if behavior.reset_on_entry {
            self.buffer.zero_all();
            self.spawn.reset();
            self.trails.reset();
        }
        fields::fill_entry(&mut self.targets, technique, &mut self.rng);
    }

    /// Advances one frame at wall time `now` (seconds) for a surface of the
    /// given aspect ratio. Does nothing while inactive.
    pub fn tick(&mut self, now: f64, aspect: f32) -> Option<FrameOutput> {
        if !self.active {
            return None;
        }
        let behavior = self.behavior();

        if behavior.refresh == Refresh::PerFrame {
            self.void_time += VOID_FRAME_STEP;
            fields::fill_frame(&mut self.targets, self.void_time, &mut self.rng);
        }

        let mut trail_segments = 0;
        match behavior.integrator {
            Integrator::Ease { factor } => ease_toward(&mut self.buffer, &self.targets, factor),
            Integrator::Spawn => {
                let elapsed = self.clock.elapsed(now);
                let viewport = Viewport::from_camera(&self.config.camera, aspect);
                self.spawn.step(
                    &mut self.buffer,
                    &self.config.infinity,
                    elapsed,
                    &viewport,
                    self.config.camera.spawn_depth,
                    &mut self.rng,
                );
                if self.trails.capacity() > 0 {
                    self.trails
                        .update(&self.buffer, self.spawn.active_count(), &self.config.trails);
                    trail_segments = self.trails.live();
                }
            }
        }

        match behavior.rotation {
            Rotation::Spin { y, z } => {
                self.rotation.y += y;
                self.rotation.z += z;
            }
            Rotation::Reset => self.rotation = Vec3::ZERO,
        }

        let clear = if self.config.trails.fade_enabled && !behavior.opaque_background {
            ClearPolicy::Fade
        } else {
            ClearPolicy::Clear
        };
        Some(FrameOutput {
            clear,
            point_size: behavior.point_size,
            opaque_background: behavior.opaque_background,
            trail_segments,
        })
    }
}
