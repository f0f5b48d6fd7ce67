//! Core primitives.
//!
//! Small value types shared by the simulation and the network layer.

pub mod vec2;
pub mod rng;

// Re-export core types
pub use vec2::Vec2;
pub use rng::DeterministicRng;
