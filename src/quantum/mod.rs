//! Single-qubit visualiser: the state, the gates the page buttons apply,
//! and the Bloch-sphere scene drawn from it.

pub mod bloch;
pub mod qubit;

pub use bloch::{BlochFrame, BlochScene, Tint};
pub use qubit::Qubit;
