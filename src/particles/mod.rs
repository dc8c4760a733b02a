//! Fixed-capacity particle buffers and the two integrators that drive them.

pub mod buffer;
pub mod ease;
pub mod spawn;
pub mod trails;

pub use buffer::{ParticleBuffer, Slot, TargetField};
pub use ease::ease_toward;
pub use spawn::{active_count, SlotPhase, SpawnField};
pub use trails::CometTrails;
