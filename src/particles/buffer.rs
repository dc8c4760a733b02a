use glam::Vec3;

/// Flat per-slot channels laid out the way the GPU consumes them:
/// `positions` and `colors` hold three floats per slot, `sizes` one.
///
/// The length is fixed at construction. Slots are only ever overwritten in
/// place; "removing" a particle means zeroing its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![0.0; len * 3],
            colors: vec![0.0; len * 3],
            sizes: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub(crate) fn channels_mut(&mut self) -> (&mut [f32], &mut [f32], &mut [f32]) {
        (&mut self.positions, &mut self.colors, &mut self.sizes)
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn color(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[i * 3..i * 3 + 3])
    }

    pub fn size(&self, i: usize) -> f32 {
        self.sizes[i]
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        p.write_to_slice(&mut self.positions[i * 3..i * 3 + 3]);
    }

    pub fn set_color(&mut self, i: usize, c: Vec3) {
        c.write_to_slice(&mut self.colors[i * 3..i * 3 + 3]);
    }

    pub fn set_size(&mut self, i: usize, s: f32) {
        self.sizes[i] = s;
    }

    /// Writes all three channels of one slot.
    pub fn set(&mut self, i: usize, slot: Slot) {
        self.set_position(i, slot.position);
        self.set_color(i, slot.color);
        self.set_size(i, slot.size);
    }

    pub fn distance_from_origin(&self, i: usize) -> f32 {
        self.position(i).length()
    }

    pub fn zero_slot(&mut self, i: usize) {
        self.set(i, Slot::ZERO);
    }

    pub fn zero_all(&mut self) {
        self.positions.fill(0.0);
        self.colors.fill(0.0);
        self.sizes.fill(0.0);
    }

    pub fn is_slot_zero(&self, i: usize) -> bool {
        self.position(i) == Vec3::ZERO && self.color(i) == Vec3::ZERO && self.sizes[i] == 0.0
    }
}

/// One slot's worth of channel data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: Vec3,
    pub color: Vec3,
    pub size: f32,
}

impl Slot {
    pub const ZERO: Self = Self {
        position: Vec3::ZERO,
        color: Vec3::ZERO,
        size: 0.0,
    };

    pub fn new(position: Vec3, color: Vec3, size: f32) -> Self {
        Self {
            position,
            color,
            size,
        }
    }
}

/// Where each slot should be for the current technique.
///
/// Same shape as [`ParticleBuffer`]; kept as a distinct type so the ease
/// integrator cannot confuse the two.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetField(ParticleBuffer);

impl TargetField {
    pub fn new(len: usize) -> Self {
        Self(ParticleBuffer::new(len))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn set(&mut self, i: usize, slot: Slot) {
        self.0.set(i, slot);
    }

    pub fn get(&self, i: usize) -> Slot {
        Slot::new(self.0.position(i), self.0.color(i), self.0.size(i))
    }

    pub fn as_buffer(&self) -> &ParticleBuffer {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_with_fixed_len() {
        let buffer = ParticleBuffer::new(4);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.positions().len(), 12);
        assert_eq!(buffer.colors().len(), 12);
        assert!((0..4).all(|i| buffer.is_slot_zero(i)));
    }

    #[test]
    fn slot_round_trips_through_flat_channels() {
        let mut buffer = ParticleBuffer::new(3);
        buffer.set(1, Slot::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.1, 0.2, 3.0), 2.5));
        assert_eq!(&buffer.positions()[3..6], &[1.0, 2.0, 3.0]);
        assert_eq!(&buffer.colors()[3..6], &[0.1, 0.2, 3.0]);
        assert_eq!(buffer.sizes()[1], 2.5);
        assert!(buffer.is_slot_zero(0));
        assert!(buffer.is_slot_zero(2));
    }

    #[test]
    fn distance_and_zeroing() {
        let mut buffer = ParticleBuffer::new(2);
        buffer.set_position(0, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(buffer.distance_from_origin(0), 5.0);
        buffer.zero_slot(0);
        assert!(buffer.is_slot_zero(0));
    }
}
