//! N-link planar kinematic chain.
//!
//! A [`KinematicChain`] is an ordered list of link lengths from the base to
//! the tip. It computes forward kinematics, per-joint world positions, and
//! the geometric Jacobian used by the IK solver.

use nalgebra::Vector2;

use waldo_core::{KinematicsError, Se2};

/// An ordered planar chain of revolute joints.
///
/// Immutable after construction: link lengths are validated once and the
/// chain is read-only thereafter, so shared references can be used from any
/// number of concurrent solves.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicChain {
    /// Link lengths, base to tip. All finite and strictly positive.
    link_lengths: Vec<f64>,
}

impl KinematicChain {
    /// Build a chain from link lengths ordered base to tip.
    ///
    /// A zero-length list is allowed and yields a degenerate chain with
    /// identity forward kinematics and an empty Jacobian.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidLinkLength`] if any length is not
    /// finite or not strictly positive (NaN included).
    pub fn new(link_lengths: Vec<f64>) -> Result<Self, KinematicsError> {
        for (index, &length) in link_lengths.iter().enumerate() {
            if !length.is_finite() || length <= 0.0 {
                return Err(KinematicsError::InvalidLinkLength { index, length });
            }
        }
        Ok(Self { link_lengths })
    }

    /// Number of revolute joints (= number of links).
    pub fn dof(&self) -> usize {
        self.link_lengths.len()
    }

    /// The link lengths, base to tip.
    pub fn link_lengths(&self) -> &[f64] {
        &self.link_lengths
    }

    /// Maximum reach: the end-effector distance from the base with the arm
    /// fully stretched.
    pub fn max_reach(&self) -> f64 {
        self.link_lengths.iter().sum()
    }

    fn check_joint_count(&self, q: &[f64]) -> Result<(), KinematicsError> {
        if q.len() != self.dof() {
            return Err(KinematicsError::JointCountMismatch {
                expected: self.dof(),
                got: q.len(),
            });
        }
        Ok(())
    }

    /// Compute forward kinematics: joint angles -> end-effector pose in the
    /// base frame.
    ///
    /// The rotation composed at joint i is the running total of the joint
    /// angles up to and including i, not the relative angle `q[i]`. Every
    /// downstream numeric result (joint positions, Jacobian, IK updates)
    /// depends on this convention.
    ///
    /// Joint angles are taken as-is: no wrapping, no limits, and non-finite
    /// values propagate into the returned pose.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::JointCountMismatch`] if `q.len() != self.dof()`.
    pub fn forward_kinematics(&self, q: &[f64]) -> Result<Se2, KinematicsError> {
        self.check_joint_count(q)?;

        let mut pose = Se2::identity();
        let mut theta_total = 0.0;
        for (&length, &angle) in self.link_lengths.iter().zip(q) {
            theta_total += angle;
            let joint = Se2::from_angle_translation(theta_total, Vector2::zeros());
            let link = Se2::from_angle_translation(0.0, Vector2::new(length, 0.0));
            pose = pose * joint * link;
        }
        Ok(pose)
    }

    /// World position of each joint, base to tip.
    ///
    /// Runs the same accumulation loop as [`forward_kinematics`](Self::forward_kinematics),
    /// recording the transform origin before translating along each link.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::JointCountMismatch`] if `q.len() != self.dof()`.
    pub fn joint_positions(&self, q: &[f64]) -> Result<Vec<Vector2<f64>>, KinematicsError> {
        self.check_joint_count(q)?;

        let mut positions = Vec::with_capacity(self.dof());
        let mut pose = Se2::identity();
        let mut theta_total = 0.0;
        for (&length, &angle) in self.link_lengths.iter().zip(q) {
            theta_total += angle;
            positions.push(pose.translation);
            let joint = Se2::from_angle_translation(theta_total, Vector2::zeros());
            let link = Se2::from_angle_translation(0.0, Vector2::new(length, 0.0));
            pose = pose * joint * link;
        }
        Ok(positions)
    }

    /// End-effector position: forward kinematics applied to the local origin.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::JointCountMismatch`] if `q.len() != self.dof()`.
    pub fn end_effector(&self, q: &[f64]) -> Result<Vector2<f64>, KinematicsError> {
        Ok(self.forward_kinematics(q)?.apply(Vector2::zeros()))
    }

    /// Geometric Jacobian of the end-effector position, as N column vectors
    /// of a conceptual 2×N matrix.
    ///
    /// Column i is the planar cross product of the joint's rotation axis
    /// with the lever arm to the end effector:
    /// `perp(p_end - p_i) = (-(p_end.y - p_i.y), p_end.x - p_i.x)`.
    ///
    /// Recomputed on every call; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::JointCountMismatch`] if `q.len() != self.dof()`.
    pub fn jacobian(&self, q: &[f64]) -> Result<Vec<Vector2<f64>>, KinematicsError> {
        let p_end = self.end_effector(q)?;
        let positions = self.joint_positions(q)?;

        Ok(positions
            .iter()
            .map(|p| Vector2::new(-(p_end.y - p.y), p_end.x - p.x))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
