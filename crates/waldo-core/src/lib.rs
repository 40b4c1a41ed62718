// waldo-core: Planar rigid transforms and error types for the waldo kinematics crates.

pub mod error;
pub mod se2;

pub use error::KinematicsError;
pub use se2::Se2;
