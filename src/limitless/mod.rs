//! The themed particle-effects canvas: five techniques sharing one
//! fixed-capacity particle cloud.

pub mod controller;
pub mod fields;
pub mod technique;

pub use controller::{ClearPolicy, FrameOutput, LimitlessField};
pub use technique::{Behavior, Integrator, Refresh, Rotation, Technique};
