//! Bloch-sphere scene driven by a [`Qubit`].
//!
//! The sphere, its wireframe and the wandering surface particles are pure
//! decoration; the state vectors, probability clouds and interference ring
//! are derived from the qubit every frame.

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::qubit::Qubit;
use crate::config::QuantumConfig;
use crate::projection::{Orbit, Projected};

const TIME_STEP: f32 = 0.015;
const LIGHT: Vec3 = Vec3::new(0.5, 0.5, 1.0);

/// The two accent colours of the page palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Frost,
    Mauve,
}

impl Tint {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tint::Frost => (136, 192, 208),
            Tint::Mauve => (180, 142, 173),
        }
    }

    pub fn css(self, alpha: f32) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r}, {g}, {b}, {})", alpha.clamp(0.0, 1.0))
    }
}

/// Unit-sphere point at azimuth `theta`, polar angle `phi`.
fn sphere_point(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Inclusive float range, `start, start + step, ...` up to `end`.
fn steps(start: f32, end: f32, step: f32) -> impl Iterator<Item = f32> {
    let count = ((end - start) / step + 1e-4).floor() as usize;
    (0..=count).map(move |k| start + k as f32 * step)
}

#[derive(Debug, Clone)]
struct TrailDot {
    at: Projected,
    life: f32,
}

#[derive(Debug, Clone)]
struct SurfaceParticle {
    theta: f32,
    phi: f32,
    life: f32,
    speed: f32,
    tint: Tint,
    trail: VecDeque<TrailDot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub at: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub tint: Tint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateArrow {
    pub start: Vec2,
    pub end: Projected,
    pub prob: f32,
    pub tint: Tint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub at: Projected,
    pub prob: f32,
    pub tint: Tint,
    pub pulse: f32,
    /// Orbiting specks around the cloud centre.
    pub orbiters: Vec<Projected>,
}

/// Draw data for one frame, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlochFrame {
    pub radius: f32,
    /// Sphere surface sample, far to near.
    pub surface: Vec<Dot>,
    /// Latitude and longitude polylines.
    pub wireframe: Vec<Vec<Vec2>>,
    pub trails: Vec<Dot>,
    /// Surface particle heads with their remaining life.
    pub particles: Vec<(Projected, f32, Tint)>,
    pub arrows: Vec<StateArrow>,
    /// Field specks ringing each arrow head.
    pub fields: Vec<Dot>,
    pub clouds: Vec<Cloud>,
    pub interference: Vec<Dot>,
    pub wave: Vec<Vec2>,
}

pub struct BlochScene {
    config: QuantumConfig,
    orbit: Orbit,
    time: f32,
    size: Vec2,
    particles: Vec<SurfaceParticle>,
    rng: ChaCha8Rng,
}

impl BlochScene {
    pub fn new(config: QuantumConfig, seed: u64) -> Self {
        Self {
            orbit: Orbit::new(&config.orbit),
            config,
            time: 0.0,
            size: Vec2::ZERO,
            particles: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn orbit_mut(&mut self) -> &mut Orbit {
        &mut self.orbit
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.size.x / 2.0, self.size.y / 2.0 + self.config.center_offset_y)
    }

    pub fn radius(&self) -> f32 {
        self.size.min_element() * self.config.radius_fraction
    }

    /// Perspective projection of an already-rotated unit-sphere point.
    fn project(&self, v: Vec3) -> Projected {
        let p = self.config.perspective;
        let scale = p / (p + v.z);
        let center = self.center();
        let radius = self.radius();
        Projected {
            x: center.x + v.x * radius * scale,
            y: center.y + v.y * radius * scale,
            z: v.z,
            scale: scale.max(0.1),
        }
    }

    fn surface(&self, theta: f32, phi: f32) -> Projected {
        self.project(self.orbit.rotate(sphere_point(theta, phi)))
    }

    pub fn tick(&mut self) {
        self.time += TIME_STEP;
        self.orbit.tick();

        if self.rng.gen::<f32>() < self.config.particle_chance {
            let particle = SurfaceParticle {
                theta: self.rng.gen::<f32>() * TAU,
                phi: self.rng.gen::<f32>() * PI,
                life: 1.0,
                speed: 0.01 + self.rng.gen::<f32>() * 0.02,
                tint: if self.rng.gen_bool(0.5) { Tint::Mauve } else { Tint::Frost },
                trail: VecDeque::with_capacity(self.config.trail_length + 1),
            };
            self.particles.push(particle);
        }

        let time = self.time;
        let trail_length = self.config.trail_length;
        let mut particles = std::mem::take(&mut self.particles);
        particles.retain_mut(|p| {
            p.life -= 0.008;
            let drift = (time * 3.0 + p.theta * 3.0).sin() * 0.02;
            p.theta += p.speed + drift;
            p.phi += p.speed * 0.5;

            for dot in &mut p.trail {
                dot.life -= 0.1;
            }
            p.trail.push_back(TrailDot {
                at: self.surface(p.theta, p.phi),
                life: 1.0,
            });
            while p.trail.len() > trail_length {
                p.trail.pop_front();
            }
            p.life > 0.0
        });
        self.particles = particles;
    }

    pub fn frame(&self, qubit: &Qubit) -> BlochFrame {
        let mut frame = BlochFrame {
            radius: self.radius(),
            ..BlochFrame::default()
        };
        self.sphere(&mut frame);
        self.surface_particles(&mut frame);

        let (p0, p1) = qubit.probabilities();
        let (a0, a1) = qubit.phases();
        for (angle, prob, tint) in [(a0, p0, Tint::Frost), (a1, p1, Tint::Mauve)] {
            if prob < 0.01 {
                continue;
            }
            self.state_vector(&mut frame, angle, prob, tint);
        }
        if p0 > 0.1 && p1 > 0.1 {
            self.interference(&mut frame, (a0, p0), (a1, p1));
        }
        self.wave(&mut frame);
        frame
    }

    fn sphere(&self, frame: &mut BlochFrame) {
        let step = PI / 25.0;
        let mut grid: Vec<(Projected, f32)> = Vec::new();
        for phi in steps(0.0, PI, step) {
            for theta in steps(0.0, TAU, step) {
                let normal = self.orbit.rotate(sphere_point(theta, phi));
                let lit = ((normal.dot(LIGHT) + 1.0) / 2.0).max(0.15);
                let shimmer = (self.time * 2.0 + theta * 2.0).sin() * 0.2;
                grid.push((self.project(normal), lit + shimmer));
            }
        }
        grid.sort_by(|a, b| b.0.z.total_cmp(&a.0.z));
        frame.surface = grid
            .into_iter()
            .map(|(at, brightness)| Dot {
                at: at.xy(),
                radius: 4.0 * at.scale,
                alpha: 0.2 * brightness * at.scale,
                tint: Tint::Frost,
            })
            .collect();

        let line = |coarse: f32, fine_end: f32, latitude: bool| -> Vec<Vec2> {
            steps(0.0, fine_end, PI / 30.0)
                .map(|fine| {
                    let (theta, phi) = if latitude { (fine, coarse) } else { (coarse, fine) };
                    self.surface(theta, phi).xy()
                })
                .collect()
        };
        for phi in steps(0.0, PI, PI / 8.0) {
            frame.wireframe.push(line(phi, TAU, true));
        }
        for theta in steps(0.0, TAU, PI / 8.0) {
            frame.wireframe.push(line(theta, PI, false));
        }
    }

    fn surface_particles(&self, frame: &mut BlochFrame) {
        for p in &self.particles {
            for dot in p.trail.iter().filter(|d| d.life > 0.0) {
                frame.trails.push(Dot {
                    at: dot.at.xy(),
                    radius: 2.0 * dot.at.scale,
                    alpha: dot.life * p.life * 0.4,
                    tint: p.tint,
                });
            }
            if let Some(head) = p.trail.back() {
                frame.particles.push((head.at, p.life, p.tint));
            }
        }
    }

    fn state_vector(&self, frame: &mut BlochFrame, angle: f32, prob: f32, tint: Tint) {
        let reach = sphere_point(angle, FRAC_PI_2) * prob.sqrt();
        let end = self.project(self.orbit.rotate(reach));
        let start = self.project(Vec3::ZERO).xy();

        for i in 0..20 {
            let around = i as f32 / 20.0 * TAU;
            let dist = 15.0 + (self.time * 2.0 + around * 3.0).sin() * 5.0;
            frame.fields.push(Dot {
                at: end.xy() + Vec2::from_angle(around) * dist * end.scale,
                radius: 2.0 * end.scale,
                alpha: 0.3 * prob * end.scale,
                tint,
            });
        }
        frame.arrows.push(StateArrow {
            start,
            end,
            prob,
            tint,
        });

        let pulse = (self.time * 3.0).sin() * 0.2 + 0.8;
        let orbit_radius = 0.4 * prob;
        let orbiters = (0..25)
            .map(|i| {
                let a = i as f32 / 25.0 * TAU + self.time * 2.0;
                let offset = Vec3::new(a.cos() * orbit_radius, a.sin() * orbit_radius, 0.0);
                self.project(self.orbit.rotate(reach) + offset)
            })
            .collect();
        frame.clouds.push(Cloud {
            at: end,
            prob,
            tint,
            pulse,
            orbiters,
        });
    }

    fn interference(&self, frame: &mut BlochFrame, (a0, p0): (f32, f32), (a1, p1): (f32, f32)) {
        for i in 0..50 {
            let theta = i as f32 / 50.0 * TAU;
            let amplitude = ((theta - a0).cos() * p0 + (theta - a1).cos() * p1).abs();
            let strength = amplitude * p0.min(p1) * 0.5;
            if strength <= 0.15 {
                continue;
            }
            let at = self.surface_scaled(theta, 0.85);
            let pulse = (self.time * 4.0 + theta * 2.0).sin() * 0.3 + 0.7;
            frame.interference.push(Dot {
                at: at.xy(),
                radius: 4.0 * strength * at.scale,
                alpha: strength * pulse * at.scale,
                tint: Tint::Mauve,
            });
        }
    }

    fn surface_scaled(&self, theta: f32, scale: f32) -> Projected {
        self.project(self.orbit.rotate(sphere_point(theta, FRAC_PI_2) * scale))
    }

    fn wave(&self, frame: &mut BlochFrame) {
        let radius = self.radius();
        if radius <= 0.0 {
            return;
        }
        frame.wave = steps(-radius, radius, 3.0)
            .map(|x| {
                let u = x / radius;
                let arg = u * PI * 3.0 + self.time * 2.0;
                let v = Vec3::new(u, arg.sin() * 20.0 / radius, arg.cos() * 15.0 / radius);
                self.project(self.orbit.rotate(v)).xy()
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> BlochScene {
        let mut scene = BlochScene::new(QuantumConfig::default(), 4);
        scene.resize(1000.0, 800.0);
        scene
    }

    #[test]
    fn ground_state_draws_one_arrow() {
        let scene = scene();
        let frame = scene.frame(&Qubit::ZERO);
        assert_eq!(frame.arrows.len(), 1);
        assert_eq!(frame.arrows[0].tint, Tint::Frost);
        assert_eq!(frame.clouds[0].orbiters.len(), 25);
        assert_eq!(frame.fields.len(), 20);
        assert!(frame.interference.is_empty());
    }

    #[test]
    fn superposition_shows_interference() {
        let scene = scene();
        let mut q = Qubit::ZERO;
        q.hadamard();
        let frame = scene.frame(&q);
        assert_eq!(frame.arrows.len(), 2);
        assert!(!frame.interference.is_empty());
    }

    #[test]
    fn sphere_sample_is_sorted_far_to_near() {
        let scene = scene();
        let frame = scene.frame(&Qubit::ZERO);
        assert_eq!(frame.surface.len(), 26 * 51);
        assert_eq!(frame.wireframe.len(), 9 + 17);
        let radius = scene.radius();
        let center = scene.center();
        for dot in &frame.surface {
            assert!(dot.at.distance(center) <= radius * 1.01);
        }
    }

    #[test]
    fn particles_spawn_and_expire() {
        let mut scene = scene();
        for _ in 0..50 {
            scene.tick();
        }
        assert!(scene.particle_count() > 0);
        let frame = scene.frame(&Qubit::ZERO);
        assert!(frame.trails.iter().all(|d| d.alpha > 0.0));

        scene.config.particle_chance = 0.0;
        for _ in 0..200 {
            scene.tick();
        }
        assert_eq!(scene.particle_count(), 0);
    }

    #[test]
    fn trails_are_capped() {
        let mut scene = scene();
        scene.config.particle_chance = 1.0;
        for _ in 0..40 {
            scene.tick();
        }
        assert!(scene.particles.iter().all(|p| p.trail.len() <= 15));
    }

    #[test]
    fn wave_spans_the_sphere() {
        let scene = scene();
        let frame = scene.frame(&Qubit::ZERO);
        let radius = scene.radius();
        assert_eq!(frame.wave.len(), (2.0 * radius / 3.0) as usize + 1);
    }

    #[test]
    fn css_colours() {
        assert_eq!(Tint::Frost.css(0.5), "rgba(136, 192, 208, 0.5)");
        assert_eq!(Tint::Mauve.css(2.0), "rgba(180, 142, 173, 1)");
    }
}
