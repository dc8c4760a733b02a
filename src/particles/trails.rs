use glam::Vec3;

use super::buffer::ParticleBuffer;
use crate::config::TrailConfig;

/// Short comet tails behind the leading slots of a spawn-driven cloud.
///
/// Each tail is one line segment from a point "behind" the particle to the
/// particle itself, so trajectories stay readable even when points are tiny.
/// Vertex data is kept in the flat layout a line-segment draw call expects:
/// two vertices per segment, three floats per vertex.
#[derive(Debug, Clone)]
pub struct CometTrails {
    previous: Vec<Vec3>,
    positions: Vec<f32>,
    colors: Vec<f32>,
    live: usize,
}

impl CometTrails {
    pub fn new(capacity: usize) -> Self {
        Self {
            previous: vec![Vec3::ZERO; capacity],
            positions: vec![0.0; capacity * 6],
            colors: vec![0.0; capacity * 6],
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.previous.len()
    }

    /// Segments carrying data after the last update.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Forget history so the first tails after a restart do not streak
    /// across the screen.
    pub fn reset(&mut self) {
        self.previous.fill(Vec3::ZERO);
        self.positions.fill(0.0);
        self.colors.fill(0.0);
        self.live = 0;
    }

    /// Rebuilds the tails for the first `active` slots of `buffer`.
    pub fn update(&mut self, buffer: &ParticleBuffer, active: usize, config: &TrailConfig) {
        let count = active.min(self.capacity()).min(buffer.len());

        for i in 0..count {
            let head = buffer.position(i);
            let delta = head - self.previous[i];
            let tail = if delta.length() < config.comet_min_len {
                head
            } else {
                head - delta * config.comet_stretch
            };
            let color = buffer.color(i);

            let seg = i * 6;
            tail.write_to_slice(&mut self.positions[seg..seg + 3]);
            head.write_to_slice(&mut self.positions[seg + 3..seg + 6]);
            (color * 0.9).write_to_slice(&mut self.colors[seg..seg + 3]);
            color.write_to_slice(&mut self.colors[seg + 3..seg + 6]);

            self.previous[i] = head;
        }

        self.positions[count * 6..].fill(0.0);
        self.colors[count * 6..].fill(0.0);
        self.live = count;
    }
}
