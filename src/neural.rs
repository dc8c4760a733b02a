//! Layered "neural network" scene for a Canvas 2D surface.
//!
//! Neurons sit on a grid per layer, pushed back in depth layer by layer, and
//! the whole network is viewed through an orbiting perspective camera. The
//! pointer excites nearby neurons; clicks fire a pulse through a layer, and
//! busy connections emit small data particles that travel to the next layer.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::NeuralConfig;
use crate::particles::ease::ease_scalar;
use crate::projection::{project, Orbit, Projected};

const TIME_STEP: f32 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    /// Position relative to the canvas centre.
    pub position: Vec3,
    pub activation: f32,
    pub phase: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pulse {
    pub layer: usize,
    pub progress: f32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataParticle {
    from: Vec3,
    to: Vec3,
    progress: f32,
    hue: f32,
}

/// One neuron ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronSprite {
    pub at: Projected,
    /// Activation plus the idle shimmer, never negative.
    pub glow: f32,
    pub hue: f32,
    /// Summed strength of pulses crossing this neuron's layer.
    pub pulse: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSprite {
    pub from: Projected,
    pub to: Projected,
    pub strength: f32,
    pub hue: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSprite {
    pub at: Projected,
    pub hue: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PulseRing {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Everything the presenter draws for one frame, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeuralFrame {
    pub connections: Vec<ConnectionSprite>,
    /// Sorted far to near.
    pub neurons: Vec<NeuronSprite>,
    pub data: Vec<DataSprite>,
    pub pulses: Vec<PulseRing>,
}

pub struct NeuralScene {
    config: NeuralConfig,
    layers: Vec<Vec<Neuron>>,
    size: Vec2,
    pointer: Vec2,
    time: f32,
    orbit: Orbit,
    pulses: Vec<Pulse>,
    data: Vec<DataParticle>,
    rng: ChaCha8Rng,
}

impl NeuralScene {
    pub fn new(config: NeuralConfig, seed: u64) -> Self {
        Self {
            orbit: Orbit::new(&config.orbit),
            config,
            layers: Vec::new(),
            size: Vec2::ZERO,
            pointer: Vec2::ZERO,
            time: 0.0,
            pulses: Vec::new(),
            data: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn layers(&self) -> &[Vec<Neuron>] {
        &self.layers
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    /// Lays the network out for a `width` × `height` canvas. Drops any
    /// in-flight pulses and data particles.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        let count = self.config.layers.len();
        let half = self.size / 2.0;

        self.layers = (0..count)
            .map(|l| {
                let per_layer = self.config.layers[l];
                let layer_z = (l as f32 - count as f32 / 2.0) * self.config.depth_spacing;
                (0..per_layer)
                    .map(|n| {
                        let x = (l + 1) as f32 * (width / (count + 1) as f32) - half.x;
                        let y = (n + 1) as f32 * (height / (per_layer + 1) as f32) - half.y;
                        let z = layer_z + (self.rng.gen::<f32>() - 0.5) * 50.0;
                        Neuron {
                            position: Vec3::new(x, y, z),
                            activation: 0.0,
                            phase: self.rng.gen::<f32>() * TAU,
                        }
                    })
                    .collect()
            })
            .collect();

        self.pointer = half;
        self.pulses.clear();
        self.data.clear();
    }

    fn project(&self, v: Vec3) -> Projected {
        project(self.orbit.rotate(v), self.config.perspective, self.size / 2.0)
    }

    pub fn pointer_moved(&mut self, pointer: Vec2) {
        self.pointer = pointer;
        self.orbit.pointer_moved(pointer);
    }

    pub fn pointer_down(&mut self) {
        self.orbit.begin_drag();
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self) {
        self.orbit.end_drag();
    }

    /// Fires the neuron nearest to `at` if one is close enough. Returns
    /// whether anything fired.
    pub fn click(&mut self, at: Vec2) -> bool {
        let nearest = self
            .layers
            .iter()
            .enumerate()
            .flat_map(|(l, layer)| layer.iter().enumerate().map(move |(n, neuron)| (l, n, neuron)))
            .map(|(l, n, neuron)| (l, n, self.project(neuron.position).xy().distance(at)))
            .min_by(|a, b| a.2.total_cmp(&b.2));

        match nearest {
            Some((l, n, dist)) if dist < self.config.click_radius => {
                self.layers[l][n].activation = 1.0;
                self.fire(l);
                true
            }
            _ => false,
        }
    }

    fn fire(&mut self, layer: usize) {
        self.pulses.push(Pulse {
            layer,
            progress: 0.0,
            intensity: 1.0,
        });
    }

    pub fn tick(&mut self) {
        self.time += TIME_STEP;
        self.orbit.tick();

        for l in 0..self.layers.len() {
            for n in 0..self.layers[l].len() {
                let at = self.project(self.layers[l][n].position);
                let dist = at.xy().distance(self.pointer);
                let target = (1.0 - dist / self.config.activation_radius).max(0.0);
                let neuron = &mut self.layers[l][n];
                neuron.activation = ease_scalar(neuron.activation, target, self.config.activation_ease);
                if neuron.activation > 0.7 && self.rng.gen::<f32>() < 0.01 {
                    self.fire(l);
                }
            }
        }

        for l in 0..self.layers.len().saturating_sub(1) {
            for a in 0..self.layers[l].len() {
                for b in 0..self.layers[l + 1].len() {
                    let (from, to) = (&self.layers[l][a], &self.layers[l + 1][b]);
                    let strength = (from.activation + to.activation) * 0.5;
                    if strength > 0.3 && self.rng.gen::<f32>() < 0.02 {
                        let particle = DataParticle {
                            from: from.position,
                            to: to.position,
                            progress: 0.0,
                            hue: 180.0 + strength * 60.0,
                        };
                        self.data.push(particle);
                    }
                }
            }
        }

        self.data.retain_mut(|p| {
            p.progress += 0.03;
            p.progress < 1.0
        });
        self.pulses.retain_mut(|p| {
            p.progress += 0.05;
            p.intensity *= 0.95;
            p.progress < 1.0 && p.intensity >= 0.1
        });
    }

    fn pulse_strength(&self, layer: usize) -> f32 {
        self.pulses
            .iter()
            .filter(|p| p.layer == layer)
            .map(|p| (1.0 - (p.progress - 0.5).abs() * 2.0) * p.intensity)
            .sum()
    }

    pub fn frame(&self) -> NeuralFrame {
        let perspective = self.config.perspective;
        let mut frame = NeuralFrame::default();

        for l in 0..self.layers.len().saturating_sub(1) {
            for from in &self.layers[l] {
                for to in &self.layers[l + 1] {
                    let (a, b) = (self.project(from.position), self.project(to.position));
                    if !(a.is_visible(perspective) && b.is_visible(perspective)) {
                        continue;
                    }
                    let strength = (from.activation + to.activation) * 0.5;
                    frame.connections.push(ConnectionSprite {
                        from: a,
                        to: b,
                        strength,
                        hue: 180.0 + strength * 60.0,
                    });
                }
            }
        }

        for (l, layer) in self.layers.iter().enumerate() {
            let pulse = self.pulse_strength(l);
            for neuron in layer {
                let at = self.project(neuron.position);
                if !at.is_visible(perspective) {
                    continue;
                }
                let shimmer = (self.time + neuron.phase).sin() * 0.3;
                let glow = (neuron.activation + shimmer * 0.2).max(0.0);
                frame.neurons.push(NeuronSprite {
                    at,
                    glow,
                    hue: 180.0 + glow * 80.0,
                    pulse,
                });
            }
        }
        frame.neurons.sort_by(|a, b| b.at.z.total_cmp(&a.at.z));

        frame.data = self
            .data
            .iter()
            .map(|p| DataSprite {
                at: self.project(p.from.lerp(p.to, p.progress)),
                hue: p.hue,
            })
            .filter(|s| s.at.is_visible(perspective))
            .collect();

        let count = self.layers.len();
        frame.pulses = self
            .pulses
            .iter()
            .map(|p| PulseRing {
                center: Vec2::new(
                    (p.layer + 1) as f32 * (self.size.x / (count + 1) as f32),
                    self.size.y / 2.0,
                ),
                radius: p.progress * self.size.x * 0.3,
                alpha: p.intensity * (1.0 - p.progress) * 0.3,
            })
            .collect();

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> NeuralScene {
        let mut scene = NeuralScene::new(NeuralConfig::default(), 11);
        scene.resize(800.0, 600.0);
        scene
    }

    #[test]
    fn layout_follows_layer_sizes() {
        let scene = scene();
        let sizes: Vec<_> = scene.layers().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 6, 6, 4]);
        let first = &scene.layers()[0][0];
        assert_eq!(first.position.x, 160.0 - 400.0);
        assert_eq!(first.position.y, 120.0 - 300.0);
        assert!((first.position.z + 400.0).abs() <= 25.0);
    }

    #[test]
    fn pointer_excites_nearby_neurons() {
        let mut scene = scene();
        let target = scene.project(scene.layers()[1][2].position).xy();
        scene.pointer_moved(target);
        scene.tick();
        let near = scene.layers()[1][2].activation;
        let far = scene.layers()[3][0].activation;
        assert!(near > 0.1);
        assert!(near > far);
    }

    #[test]
    fn click_on_neuron_fires_pulse() {
        let mut scene = scene();
        let at = scene.project(scene.layers()[2][0].position).xy();
        assert!(scene.click(at));
        assert_eq!(scene.layers()[2][0].activation, 1.0);
        assert_eq!(scene.pulses().len(), 1);
        assert_eq!(scene.pulses()[0].layer, 2);
    }

    #[test]
    fn click_in_empty_space_does_nothing() {
        let mut scene = scene();
        assert!(!scene.click(Vec2::new(-500.0, -500.0)));
        assert!(scene.pulses().is_empty());
    }

    #[test]
    fn pulses_fade_out() {
        let mut scene = scene();
        scene.fire(0);
        scene.pointer_moved(Vec2::new(-10_000.0, -10_000.0));
        for _ in 0..60 {
            scene.tick();
        }
        assert!(scene.pulses().is_empty());
    }

    #[test]
    fn frame_is_sorted_far_to_near() {
        let mut scene = scene();
        scene.tick();
        let frame = scene.frame();
        assert_eq!(frame.neurons.len(), 20);
        assert_eq!(frame.connections.len(), 4 * 6 + 6 * 6 + 6 * 4);
        assert!(frame.neurons.windows(2).all(|w| w[0].at.z >= w[1].at.z));
        assert!(frame.neurons.iter().all(|n| n.glow >= 0.0));
    }

    #[test]
    fn resize_recentres_pointer_and_drops_effects() {
        let mut scene = scene();
        scene.fire(1);
        scene.resize(400.0, 400.0);
        assert!(scene.pulses().is_empty());
        assert_eq!(scene.pointer, Vec2::new(200.0, 200.0));
    }
}
