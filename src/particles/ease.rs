//! First-order low-pass toward the target field.
//!
//! Each channel closes a fixed fraction `k` of its remaining distance per
//! tick. There is no velocity state, so there is no overshoot; channels
//! converge asymptotically and a channel already at its target stays there.

use super::buffer::{ParticleBuffer, TargetField};

#[inline]
pub fn ease_scalar(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}

fn ease_slice(current: &mut [f32], target: &[f32], k: f32) {
    for (c, t) in current.iter_mut().zip(target) {
        *c = ease_scalar(*c, *t, k);
    }
}

/// One ease step for every slot and every channel.
pub fn ease_toward(buffer: &mut ParticleBuffer, targets: &TargetField, k: f32) {
    let target = targets.as_buffer();
    let (positions, colors, sizes) = buffer.channels_mut();
    ease_slice(positions, target.positions(), k);
    ease_slice(colors, target.colors(), k);
    ease_slice(sizes, target.sizes(), k);
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::particles::buffer::Slot;

    #[test]
    fn tenth_of_remaining_distance_per_tick() {
        let once = ease_scalar(0.0, 10.0, 0.1);
        assert!((once - 1.0).abs() < 1e-6);
        let twice = ease_scalar(once, 10.0, 0.1);
        assert!((twice - 1.9).abs() < 1e-6);
    }

    #[test]
    fn fixed_point_is_stable() {
        let mut buffer = ParticleBuffer::new(2);
        let mut targets = TargetField::new(2);
        let slot = Slot::new(Vec3::new(-4.0, 2.0, 9.5), Vec3::new(3.0, 0.1, 0.1), 2.5);
        targets.set(0, slot);
        buffer.set(0, slot);

        for _ in 0..10 {
            ease_toward(&mut buffer, &targets, 0.15);
        }
        assert_eq!(buffer.position(0), slot.position);
        assert_eq!(buffer.color(0), slot.color);
        assert_eq!(buffer.size(0), slot.size);
        assert!(buffer.is_slot_zero(1));
    }

    #[test]
    fn every_channel_moves() {
        let mut buffer = ParticleBuffer::new(1);
        let mut targets = TargetField::new(1);
        targets.set(0, Slot::new(Vec3::splat(10.0), Vec3::splat(1.0), 2.0));
        ease_toward(&mut buffer, &targets, 0.5);
        assert_eq!(buffer.position(0), Vec3::splat(5.0));
        assert_eq!(buffer.color(0), Vec3::splat(0.5));
        assert_eq!(buffer.size(0), 1.0);
    }
}
