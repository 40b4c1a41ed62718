//! Shared test oracles and fixtures for the waldo kinematics crates.
//!
//! Provides an independently derived reference Jacobian, a central
//! finite-difference Jacobian, and deterministic RNG setup. Everything here
//! is strictly cross-check material consumed through dev-dependencies; the
//! production Jacobian lives in `waldo-ik`.

pub mod jacobian;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use jacobian::{numerical_jacobian, reference_jacobian, trig_position};
pub use rng::{random_angles, seeded_rng};
