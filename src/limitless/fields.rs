//! Target field generators, one per technique.
//!
//! Each generator maps a slot index (out of `n`) to where that slot belongs.
//! Most split the index range into bands and place each band with its own
//! closed form. Several sample randomly, so regenerating a field reshuffles
//! it.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::technique::Technique;
use crate::particles::{Slot, TargetField};

/// Uniform direction on the unit sphere.
fn unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Symmetric jitter in `[-span/2, span/2)`.
fn jitter<R: Rng + ?Sized>(rng: &mut R, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}

/// Infinity builds its cloud with the spawn integrator; its target is empty.
pub fn infinity(_i: usize, _n: usize) -> Slot {
    Slot::ZERO
}

/// Attractive singularity: a dense core and three converging spiral arms.
pub fn blue<R: Rng + ?Sized>(i: usize, n: usize, rng: &mut R) -> Slot {
    let core = n as f32 * 0.1;
    if (i as f32) < core {
        let r = rng.gen::<f32>() * 9.0;
        return Slot::new(unit_sphere(rng) * r, Vec3::new(0.1, 0.3, 3.0), 2.5);
    }

    const ARMS: usize = 3;
    let t = i as f32 / n as f32;
    let angle = t * 15.0 + (i % ARMS) as f32 * (TAU / ARMS as f32);
    let radius = 2.0 + t * 40.0;
    Slot::new(
        Vec3::new(radius * angle.cos(), radius * angle.sin(), jitter(rng, 10.0 * t)),
        Vec3::new(0.2, 0.5, 1.0),
        1.0,
    )
}

/// Repulsive divergence: a hot ring and an exponentially expanding shell.
pub fn red<R: Rng + ?Sized>(i: usize, n: usize, rng: &mut R) -> Slot {
    let core = n as f32 * 0.15;
    if (i as f32) < core {
        let angle = rng.gen::<f32>() * TAU;
        return Slot::new(
            Vec3::new(26.0 * angle.cos(), 26.0 * angle.sin(), jitter(rng, 1.0)),
            Vec3::new(3.0, 0.1, 0.1),
            2.5,
        );
    }

    const LAMBDA: f32 = 0.05;
    let t = i as f32 / n as f32;
    let radius = 30.0 * (LAMBDA * t * 100.0).exp();
    Slot::new(
        unit_sphere(rng) * radius,
        Vec3::new(1.0 + t * 2.0, 0.1, 0.1),
        0.7 + t,
    )
}

/// Hollow sphere with a fifth of the slots scattered as erased space.
pub fn purple<R: Rng + ?Sized>(_i: usize, _n: usize, rng: &mut R) -> Slot {
    if rng.gen::<f32>() > 0.8 {
        return Slot::new(
            Vec3::new(jitter(rng, 100.0), jitter(rng, 100.0), jitter(rng, 100.0)),
            Vec3::new(0.5, 0.5, 0.7),
            0.8,
        );
    }
    Slot::new(unit_sphere(rng) * 20.0, Vec3::new(0.6, 0.5, 1.0), 2.5)
}

/// Index bands of the Void technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidBand {
    /// Event horizon, first 2%.
    Horizon,
    /// Accretion disk, next 33%. Carries the slot's offset into the disk.
    Disk(usize),
    /// Background stars, the rest. Carries the slot's offset into the band.
    Stars(usize),
}

pub fn void_band(i: usize, n: usize) -> VoidBand {
    let horizon = n as f32 * 0.02;
    let disk_end = n as f32 * 0.35;
    let x = i as f32;
    if x < horizon {
        VoidBand::Horizon
    } else if x < disk_end {
        VoidBand::Disk((x - horizon) as usize)
    } else {
        VoidBand::Stars((x - disk_end) as usize)
    }
}

fn star_shell<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    unit_sphere(rng) * (50.0 + rng.gen::<f32>() * 150.0)
}

/// Layout used the moment Void is selected, before the first animated frame.
pub fn void_entry<R: Rng + ?Sized>(i: usize, n: usize, rng: &mut R) -> Slot {
    match void_band(i, n) {
        VoidBand::Horizon => Slot::new(Vec3::ZERO, Vec3::ZERO, 0.05),
        VoidBand::Disk(_) => {
            let t = (i as f32 - n as f32 * 0.02) / (n as f32 * 0.33);
            let radius = 6.0 + t * 25.0;
            let angle = (i as f32 / 200.0) * TAU;
            Slot::new(
                Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
                Vec3::new(0.5, 0.5, 0.8),
                0.3,
            )
        }
        VoidBand::Stars(_) => Slot::new(star_shell(rng), Vec3::splat(0.5), 0.1),
    }
}

/// Animated black hole at mode time `time`.
pub fn void_frame<R: Rng + ?Sized>(i: usize, n: usize, time: f32, rng: &mut R) -> Slot {
    match void_band(i, n) {
        VoidBand::Horizon => {
            let r = rng.gen::<f32>() * 6.0;
            Slot::new(unit_sphere(rng) * r, Vec3::ZERO, 0.05)
        }
        VoidBand::Disk(offset) => accretion_disk(offset, n, time),
        VoidBand::Stars(offset) => {
            if offset % 3 != 0 {
                return Slot::ZERO;
            }
            let twinkle = 0.5 + (time * 2.0 + offset as f32).sin() * 0.5;
            Slot::new(
                star_shell(rng),
                Vec3::new(twinkle * 0.9, twinkle * 0.9, twinkle),
                twinkle * 0.15,
            )
        }
    }
}

fn accretion_disk(offset: usize, n: usize, time: f32) -> Slot {
    let t = offset as f32 / (n as f32 * 0.33);

    let radius = 6.0 + t * 25.0 + (t * 8.0 + time * 2.0).sin() * 2.0;
    // Differential rotation: inner orbits turn faster.
    let orbital_speed = (1.0 / radius.max(8.0)) * 0.8;
    let angle = (offset as f32 / 200.0) * TAU + time * orbital_speed;
    let height = (angle * 2.0 + time).sin() * (1.0 - t) * 3.0;
    let position = Vec3::new(radius * angle.cos(), height, radius * angle.sin());

    if t < 0.3 {
        let b = 1.0 - t * 0.5;
        Slot::new(position, Vec3::new(b * 0.8, b * 0.9, b), 0.4 * b)
    } else if t < 0.6 {
        let local = (t - 0.3) / 0.3;
        Slot::new(
            position,
            Vec3::new(0.8 - local * 0.3, 0.7 - local * 0.2, 0.5 - local * 0.3),
            0.3,
        )
    } else {
        Slot::new(position, Vec3::new(0.2, 0.3, 0.6), 0.2)
    }
}

/// Writes the entry layout of `technique` into every slot of `field`.
pub fn fill_entry<R: Rng + ?Sized>(field: &mut TargetField, technique: Technique, rng: &mut R) {
    let n = field.len();
    for i in 0..n {
        let slot = match technique {
            Technique::Infinity => infinity(i, n),
            Technique::Blue => blue(i, n, rng),
            Technique::Red => red(i, n, rng),
            Technique::Purple => purple(i, n, rng),
            Technique::Void => void_entry(i, n, rng),
        };
        field.set(i, slot);
    }
}

/// Writes the animated layout of a per-frame technique at `time`.
pub fn fill_frame<R: Rng + ?Sized>(field: &mut TargetField, time: f32, rng: &mut R) {
    let n = field.len();
    for i in 0..n {
        field.set(i, void_frame(i, n, time, rng));
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const N: usize = 15_000;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn blue_core_stays_inside_radius_nine() {
        let mut rng = rng();
        for i in 0..N / 10 {
            let slot = blue(i, N, &mut rng);
            assert!(slot.position.length() <= 9.0 + 1e-4);
            assert_eq!(slot.size, 2.5);
        }
        let arm = blue(N / 2, N, &mut rng);
        assert_eq!(arm.color, Vec3::new(0.2, 0.5, 1.0));
        let planar = Vec3::new(arm.position.x, arm.position.y, 0.0).length();
        assert!((planar - 22.0).abs() < 1e-3);
    }

    #[test]
    fn red_shell_grows_exponentially() {
        let mut rng = rng();
        let ring = red(0, N, &mut rng);
        let planar = Vec3::new(ring.position.x, ring.position.y, 0.0).length();
        assert!((planar - 26.0).abs() < 1e-3);

        let last = red(N - 1, N, &mut rng);
        let expected = 30.0 * (0.05f32 * ((N - 1) as f32 / N as f32) * 100.0).exp();
        assert!((last.position.length() - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn purple_is_shell_or_scatter() {
        let mut rng = rng();
        for i in 0..2000 {
            let slot = purple(i, N, &mut rng);
            if slot.size == 2.5 {
                assert!((slot.position.length() - 20.0).abs() < 1e-3);
            } else {
                assert!(slot.position.abs().max_element() <= 50.0);
            }
        }
    }

    #[test]
    fn void_bands_partition_the_range() {
        assert_eq!(void_band(0, N), VoidBand::Horizon);
        assert_eq!(void_band(299, N), VoidBand::Horizon);
        assert_eq!(void_band(300, N), VoidBand::Disk(0));
        assert_eq!(void_band(5249, N), VoidBand::Disk(4949));
        assert_eq!(void_band(5250, N), VoidBand::Stars(0));
    }

    #[test]
    fn only_every_third_star_is_lit() {
        let mut rng = rng();
        assert_eq!(void_frame(5251, N, 1.0, &mut rng), Slot::ZERO);
        assert_eq!(void_frame(5252, N, 1.0, &mut rng), Slot::ZERO);
        let lit = void_frame(5253, N, 1.0, &mut rng);
        assert!(lit.position.length() >= 50.0 - 1e-3);
    }

    #[test]
    fn horizon_is_black() {
        let mut rng = rng();
        let slot = void_frame(10, N, 3.0, &mut rng);
        assert_eq!(slot.color, Vec3::ZERO);
        assert!(slot.position.length() <= 6.0 + 1e-4);
    }

    #[test]
    fn fill_entry_overwrites_every_slot() {
        let mut rng = rng();
        let mut field = TargetField::new(100);
        fill_entry(&mut field, Technique::Blue, &mut rng);
        assert!((0..100).all(|i| field.get(i).size > 0.0));
        fill_entry(&mut field, Technique::Infinity, &mut rng);
        assert!((0..100).all(|i| field.get(i) == Slot::ZERO));
    }
}
