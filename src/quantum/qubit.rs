use std::f32::consts::FRAC_1_SQRT_2;

/// A single qubit as two complex amplitudes, `α|0⟩ + β|1⟩`.
///
/// Only the three gates the page exposes are implemented, and they are
/// applied exactly, without renormalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qubit {
    pub re0: f32,
    pub im0: f32,
    pub re1: f32,
    pub im1: f32,
}

impl Default for Qubit {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Qubit {
    /// The |0⟩ state.
    pub const ZERO: Self = Self {
        re0: 1.0,
        im0: 0.0,
        re1: 0.0,
        im1: 0.0,
    };

    pub fn hadamard(&mut self) {
        let s = FRAC_1_SQRT_2;
        *self = Self {
            re0: s * (self.re0 + self.re1),
            im0: s * (self.im0 + self.im1),
            re1: s * (self.re0 - self.re1),
            im1: s * (self.im0 - self.im1),
        };
    }

    /// Bit flip: swaps the two amplitudes.
    pub fn pauli_x(&mut self) {
        std::mem::swap(&mut self.re0, &mut self.re1);
        std::mem::swap(&mut self.im0, &mut self.im1);
    }

    /// Phase flip: negates the |1⟩ amplitude.
    pub fn phase(&mut self) {
        self.re1 = -self.re1;
        self.im1 = -self.im1;
    }

    pub fn reset(&mut self) {
        *self = Self::ZERO;
    }

    /// `(P(0), P(1))`.
    pub fn probabilities(&self) -> (f32, f32) {
        (
            self.re0 * self.re0 + self.im0 * self.im0,
            self.re1 * self.re1 + self.im1 * self.im1,
        )
    }

    /// Complex argument of each amplitude.
    pub fn phases(&self) -> (f32, f32) {
        (self.im0.atan2(self.re0), self.im1.atan2(self.re1))
    }

    /// Status line shown under the canvas.
    pub fn label(&self) -> String {
        let (p0, p1) = self.probabilities();
        format!("|ψ⟩ = {p0:.2}|0⟩ + {p1:.2}|1⟩")
    }
}
