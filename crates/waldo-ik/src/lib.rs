//! Inverse kinematics for planar serial revolute arms.
//!
//! Provides forward kinematics, geometric Jacobian computation, and
//! Damped Least Squares (Levenberg-Marquardt) IK solving for N-link
//! planar chains.
//!
//! # Architecture
//!
//! ```text
//! link lengths ──► KinematicChain ──► DlsSolver ──► IkSolution
//! ```
//!
//! A [`KinematicChain`] is built once per arm from its link lengths and is
//! read-only thereafter. The solver takes a target position and an initial
//! joint guess, iterates on a private copy of the guess, and returns the
//! final configuration together with a [`SolveStatus`](solver::SolveStatus),
//! the iteration count, and the final error norm. Solves share no mutable
//! state, so independent calls are freely reentrant.

pub mod chain;
pub mod solver;

pub use chain::KinematicChain;
pub use solver::{solve_ik, DlsConfig, DlsSolver, IkSolution, SolveStatus};
