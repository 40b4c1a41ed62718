//! Damped Least Squares (Levenberg-Marquardt) IK solver.
//!
//! Iteratively solves for joint angles that place the end-effector at a
//! target position, using the chain's geometric Jacobian and the damped
//! pseudoinverse `Jᵗ(JJᵗ + λ²I)⁻¹`. Only position is targeted; orientation
//! is never controlled.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use waldo_core::KinematicsError;

use crate::chain::KinematicChain;

/// Determinant magnitude below which the damped 2×2 system is treated as
/// singular and the solve stops.
const SINGULAR_DET_EPS: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_tolerance() -> f64 {
    1e-6
}
const fn default_max_iterations() -> u32 {
    100
}
const fn default_step_scale() -> f64 {
    1.0
}
const fn default_damping() -> f64 {
    0.1
}

/// Configuration for the DLS solver.
///
/// All numeric thresholds are explicit per-solver state; there are no hidden
/// globals, so solves stay reentrant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DlsConfig {
    /// Convergence threshold on the position error norm (default: 1e-6).
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Maximum solver iterations (default: 100).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Step scale alpha applied to every joint update (default: 1.0).
    /// The only damper on update magnitude; joint deltas are never clamped.
    #[serde(default = "default_step_scale")]
    pub step_scale: f64,

    /// Damping factor lambda (default: 0.1). Higher = more robust near
    /// singularities, but slower convergence. Added as lambda^2 to the
    /// diagonal of JJᵗ only.
    #[serde(default = "default_damping")]
    pub damping: f64,
}

impl Default for DlsConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            step_scale: default_step_scale(),
            damping: default_damping(),
        }
    }
}

impl DlsConfig {
    /// Validate configuration. Returns Err on out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidSolverConfig`] naming the offending
    /// field.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(KinematicsError::InvalidSolverConfig(
                "tolerance must be finite and > 0",
            ));
        }
        if self.max_iterations == 0 {
            return Err(KinematicsError::InvalidSolverConfig(
                "max_iterations must be > 0",
            ));
        }
        if !(self.step_scale > 0.0 && self.step_scale.is_finite()) {
            return Err(KinematicsError::InvalidSolverConfig(
                "step_scale must be finite and > 0",
            ));
        }
        if !(self.damping >= 0.0 && self.damping.is_finite()) {
            return Err(KinematicsError::InvalidSolverConfig(
                "damping must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// How a solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Position error norm fell below the tolerance.
    Converged,
    /// The damped 2×2 system went singular; no further progress possible
    /// from this configuration.
    Stalled,
    /// The iteration budget ran out.
    Exhausted,
}

/// Result of an IK solve.
///
/// Every termination returns the current joint vector: even `Stalled` and
/// `Exhausted` carry the solver's best estimate, with the status, iteration
/// count, and final error norm alongside for the caller to judge.
#[derive(Debug, Clone, PartialEq)]
pub struct IkSolution {
    /// Final joint angles (radians), same length as the chain's DOF.
    /// Unwrapped and unlimited.
    pub joints: Vec<f64>,
    /// How the solve terminated.
    pub status: SolveStatus,
    /// Iterations completed before termination.
    pub iterations: u32,
    /// Position error norm at termination.
    pub error_norm: f64,
}

/// Damped Least Squares IK solver.
#[derive(Debug, Clone)]
pub struct DlsSolver {
    config: DlsConfig,
}

impl DlsSolver {
    /// Create a solver with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidSolverConfig`] if the configuration
    /// fails [`DlsConfig::validate`].
    pub fn new(config: DlsConfig) -> Result<Self, KinematicsError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a solver with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: DlsConfig::default(),
        }
    }

    /// The solver's configuration.
    pub fn config(&self) -> &DlsConfig {
        &self.config
    }

    /// Solve IK for the given chain and target position.
    ///
    /// `initial` is the starting joint configuration (warm-start from the
    /// arm's current state). It is copied; the caller's slice is untouched.
    /// An unreachable target is not special-cased: the damped update alone
    /// drives the arm toward its maximal-reach configuration and the solve
    /// ends `Exhausted`.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::JointCountMismatch`] if
    /// `initial.len() != chain.dof()`.
    pub fn solve(
        &self,
        chain: &KinematicChain,
        target: Vector2<f64>,
        initial: &[f64],
    ) -> Result<IkSolution, KinematicsError> {
        if initial.len() != chain.dof() {
            return Err(KinematicsError::JointCountMismatch {
                expected: chain.dof(),
                got: initial.len(),
            });
        }

        let mut q = initial.to_vec();
        let lambda_sq = self.config.damping * self.config.damping;

        for iteration in 0..self.config.max_iterations {
            let error = target - chain.end_effector(&q)?;
            let error_norm = error.norm();

            if error_norm < self.config.tolerance {
                return Ok(IkSolution {
                    joints: q,
                    status: SolveStatus::Converged,
                    iterations: iteration,
                    error_norm,
                });
            }

            let jacobian = chain.jacobian(&q)?;

            // Damped normal equations A = JJᵗ + λ²I₂, accumulated as the
            // three scalars of a symmetric 2×2 matrix. λ² lands on the
            // diagonal only.
            let mut a = lambda_sq;
            let mut b = 0.0;
            let mut c = lambda_sq;
            for column in &jacobian {
                a += column.x * column.x;
                b += column.x * column.y;
                c += column.y * column.y;
            }

            let det = a * c - b * b;
            if det.abs() < SINGULAR_DET_EPS {
                // Singular even with damping: stop with the current joints
                // rather than divide by ~0. No perturbation, no retry.
                return Ok(IkSolution {
                    joints: q,
                    status: SolveStatus::Stalled,
                    iterations: iteration,
                    error_norm,
                });
            }

            // Analytic inverse of the 2×2 system, then v = A⁻¹·e.
            let v0 = (c * error.x - b * error.y) / det;
            let v1 = (-b * error.x + a * error.y) / det;

            // Δq = α·Jᵗ·v, the damped-least-squares velocity mapped from
            // task space to joint space. No clamp beyond α, no wrapping.
            for (angle, column) in q.iter_mut().zip(&jacobian) {
                *angle += self.config.step_scale * (column.x * v0 + column.y * v1);
            }
        }

        let error_norm = (target - chain.end_effector(&q)?).norm();
        Ok(IkSolution {
            joints: q,
            status: SolveStatus::Exhausted,
            iterations: self.config.max_iterations,
            error_norm,
        })
    }
}

/// Solve IK with the default [`DlsConfig`].
///
/// # Errors
///
/// Returns [`KinematicsError::JointCountMismatch`] if
/// `initial.len() != chain.dof()`.
pub fn solve_ik(
    chain: &KinematicChain,
    target: Vector2<f64>,
    initial: &[f64],
) -> Result<IkSolution, KinematicsError> {
    DlsSolver::with_defaults().solve(chain, target, initial)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_link() -> KinematicChain {
        KinematicChain::new(vec![1.0, 1.0]).unwrap()
    }

    fn gentle_solver() -> DlsSolver {
        // Small step scale, as used by the reachable-target acceptance cases.
        DlsSolver::new(DlsConfig {
            step_scale: 0.1,
            ..DlsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn reachable_target_on_x_axis() {
        let chain = two_link();
        let target = Vector2::new(1.5, 0.0);

        let solution = gentle_solver()
            .solve(&chain, target, &[0.001, 0.0])
            .unwrap();

        // With alpha = 0.1 the error creeps below 1e-4 but not below the
        // 1e-6 tolerance inside 100 iterations.
        assert_eq!(solution.status, SolveStatus::Exhausted);
        let p = chain.end_effector(&solution.joints).unwrap();
        assert_relative_eq!(p.x, target.x, epsilon = 1e-4);
        assert_relative_eq!(p.y, target.y, epsilon = 1e-4);
    }

    #[test]
    fn diagonal_target_converges() {
        let chain = two_link();
        let target = Vector2::new(1.0, 1.0);

        let solution = solve_ik(&chain, target, &[0.5, -0.5]).unwrap();

        assert_eq!(solution.status, SolveStatus::Converged);
        assert!(solution.error_norm < 1e-6);
        let p = chain.end_effector(&solution.joints).unwrap();
        assert_relative_eq!(p.x, target.x, epsilon = 1e-4);
        assert_relative_eq!(p.y, target.y, epsilon = 1e-4);
    }

    #[test]
    fn converges_from_far_initial_guess() {
        let chain = two_link();
        let target = Vector2::new(0.5, 1.5);

        let solution = solve_ik(&chain, target, &[3.0, -2.0]).unwrap();

        assert_eq!(solution.status, SolveStatus::Converged);
        let p = chain.end_effector(&solution.joints).unwrap();
        assert_relative_eq!(p.x, target.x, epsilon = 1e-4);
        assert_relative_eq!(p.y, target.y, epsilon = 1e-4);
    }

    #[test]
    fn fk_roundtrip_recovers_target() {
        let chain = KinematicChain::new(vec![1.0, 1.0, 0.5]).unwrap();
        let target = chain.end_effector(&[0.4, 0.2, -0.3]).unwrap();

        let solution = solve_ik(&chain, target, &[0.0, 0.0, 0.0]).unwrap();

        assert_eq!(solution.status, SolveStatus::Converged);
        assert!(solution.iterations < 100);
        let p = chain.end_effector(&solution.joints).unwrap();
        assert_relative_eq!(p.x, target.x, epsilon = 1e-4);
        assert_relative_eq!(p.y, target.y, epsilon = 1e-4);
    }

    #[test]
    fn unreachable_target_stretches_to_max_reach() {
        let chain = two_link();

        let solution = gentle_solver()
            .solve(&chain, Vector2::new(3.0, 0.0), &[0.0, 0.0])
            .unwrap();

        assert_eq!(solution.status, SolveStatus::Exhausted);
        let p = chain.end_effector(&solution.joints).unwrap();
        assert_relative_eq!(p.norm(), chain.max_reach(), epsilon = 1e-4);
    }

    #[test]
    fn singular_system_stalls_without_nan() {
        // Undamped solve from the fully stretched (singular) configuration:
        // JJᵗ is rank 1, det = 0, and the solver must stop on iteration 0.
        let chain = two_link();
        let solver = DlsSolver::new(DlsConfig {
            damping: 0.0,
            ..DlsConfig::default()
        })
        .unwrap();

        let solution = solver
            .solve(&chain, Vector2::new(1.0, 1.0), &[0.0, 0.0])
            .unwrap();

        assert_eq!(solution.status, SolveStatus::Stalled);
        assert_eq!(solution.iterations, 0);
        assert!(solution.joints.iter().all(|q| q.is_finite()));
        assert_relative_eq!(solution.joints[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(solution.joints[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_chain_solves_degenerately() {
        let chain = KinematicChain::new(vec![]).unwrap();

        let at_origin = solve_ik(&chain, Vector2::zeros(), &[]).unwrap();
        assert_eq!(at_origin.status, SolveStatus::Converged);
        assert_eq!(at_origin.iterations, 0);

        let off_origin = solve_ik(&chain, Vector2::new(1.0, 0.0), &[]).unwrap();
        assert_eq!(off_origin.status, SolveStatus::Exhausted);
        assert_relative_eq!(off_origin.error_norm, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn wrong_guess_length_is_rejected() {
        let chain = two_link();
        let err = solve_ik(&chain, Vector2::zeros(), &[0.0]).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::JointCountMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn config_defaults_and_validation() {
        let config = DlsConfig::default();
        assert_relative_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_iterations, 100);
        assert_relative_eq!(config.step_scale, 1.0);
        assert_relative_eq!(config.damping, 0.1);
        assert!(config.validate().is_ok());

        let bad = DlsConfig {
            tolerance: 0.0,
            ..DlsConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(KinematicsError::InvalidSolverConfig(_))
        ));
        assert!(DlsSolver::new(bad).is_err());

        let bad = DlsConfig {
            max_iterations: 0,
            ..DlsConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = DlsConfig {
            damping: f64::NAN,
            ..DlsConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn solver_does_not_mutate_the_callers_guess() {
        let chain = two_link();
        let guess = [0.5, -0.5];
        let _ = solve_ik(&chain, Vector2::new(1.0, 1.0), &guess).unwrap();
        assert_relative_eq!(guess[0], 0.5, epsilon = 1e-15);
        assert_relative_eq!(guess[1], -0.5, epsilon = 1e-15);
    }
}
